/// Service configuration from environment variables
///
/// Controls the Aptos network, ledger backend selection and the
/// watchdog/simulation timing knobs.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Devnet,
    Mainnet,
}

impl Network {
    pub fn default_node_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://fullnode.testnet.aptoslabs.com",
            Network::Devnet => "https://fullnode.devnet.aptoslabs.com",
            Network::Mainnet => "https://fullnode.mainnet.aptoslabs.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Devnet => write!(f, "devnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Simulated,
    ChainBacked,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Aptos network the session reports
    pub network: Network,
    /// Fullnode REST endpoint (chain-backed balance queries)
    pub node_url: String,
    /// Which ledger backend serves balance/submit calls
    pub backend: BackendKind,
    /// Injected wallet providers considered present (headless stand-in
    /// for probing browser globals)
    pub available_providers: Vec<String>,
    /// Directory for the persisted session-continuity file
    pub session_dir: String,
    /// Watchdog evaluation period in seconds
    pub watchdog_interval_secs: u64,
    /// Artificial latency for simulated network calls, in milliseconds
    pub simulated_latency_ms: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `APTOS_NETWORK`: "testnet" (default), "devnet" or "mainnet"
    /// - `APTOS_NODE_URL`: fullnode REST endpoint (optional, per-network default)
    /// - `LEDGER_BACKEND`: "simulated" (default) or "chain"
    /// - `WALLET_PROVIDERS`: comma list, e.g. "petra,martian" (default "petra")
    /// - `SESSION_DIR`: where session.json lives (default "./session")
    /// - `WATCHDOG_INTERVAL_SECS`: watchdog tick period (default 1)
    /// - `SIMULATED_LATENCY_MS`: simulated confirmation delay (default 400)
    pub fn from_env() -> Self {
        let network_str = env::var("APTOS_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "mainnet" => {
                log::info!("🌐 Using MAINNET network");
                Network::Mainnet
            }
            "devnet" => {
                log::info!("🔧 Using DEVNET network");
                Network::Devnet
            }
            "testnet" | "" => Network::Testnet,
            other => {
                log::warn!("Unknown network '{}', defaulting to testnet", other);
                Network::Testnet
            }
        };

        let node_url = env::var("APTOS_NODE_URL")
            .unwrap_or_else(|_| network.default_node_url().to_string());
        log::info!("📡 Fullnode URL: {}", node_url);

        let backend = match env::var("LEDGER_BACKEND").as_deref() {
            Ok("chain") => BackendKind::ChainBacked,
            Ok("simulated") | Err(_) => BackendKind::Simulated,
            Ok(other) => {
                log::warn!("Unknown ledger backend '{}', using simulated", other);
                BackendKind::Simulated
            }
        };

        let available_providers = env::var("WALLET_PROVIDERS")
            .unwrap_or_else(|_| "petra".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let session_dir = env::var("SESSION_DIR").unwrap_or_else(|_| "./session".to_string());

        let watchdog_interval_secs = env::var("WATCHDOG_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        let simulated_latency_ms = env::var("SIMULATED_LATENCY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(400);

        Self {
            network,
            node_url,
            backend,
            available_providers,
            session_dir,
            watchdog_interval_secs,
            simulated_latency_ms,
        }
    }
}

impl Default for AppConfig {
    /// Default configuration (simulated testnet)
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            node_url: Network::Testnet.default_node_url().to_string(),
            backend: BackendKind::Simulated,
            available_providers: vec!["petra".to_string()],
            session_dir: "./session".to_string(),
            watchdog_interval_secs: 1,
            simulated_latency_ms: 400,
        }
    }
}
