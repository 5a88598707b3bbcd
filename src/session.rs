use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Network;
use crate::provider::ProviderKind;
use crate::switch::{ActionLog, HeartbeatState, LockedAsset};

/// Connection-facing half of the session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: Option<String>,
    pub is_connected: bool,
    pub balances: BTreeMap<String, f64>,
    pub network: Network,
    pub provider: Option<ProviderKind>,
    pub wallet_name: Option<String>,
}

impl WalletSession {
    pub fn disconnected(network: Network) -> Self {
        Self {
            address: None,
            is_connected: false,
            balances: zero_balances(),
            network,
            provider: None,
            wallet_name: None,
        }
    }
}

/// Tokens the session tracks.
pub const KNOWN_TOKENS: [&str; 3] = ["APT", "USDC", "TEST"];

pub fn zero_balances() -> BTreeMap<String, f64> {
    KNOWN_TOKENS
        .iter()
        .map(|token| (token.to_string(), 0.0))
        .collect()
}

/// The whole mutable session.
///
/// This is the copy-on-write unit: mutations clone the current state,
/// edit the clone and swap it in whole, so the periodic watchdog tick
/// never observes a partial update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub wallet: WalletSession,
    pub heartbeat: HeartbeatState,
    pub locked_assets: Vec<LockedAsset>,
    pub action_log: ActionLog,
}

impl SessionState {
    pub fn new(network: Network) -> Self {
        Self {
            wallet: WalletSession::disconnected(network),
            heartbeat: HeartbeatState::default(),
            locked_assets: Vec::new(),
            action_log: ActionLog::new(),
        }
    }

    pub fn has_locked_assets(&self) -> bool {
        self.locked_assets
            .iter()
            .any(|asset| asset.status == crate::switch::AssetStatus::Locked)
    }
}
