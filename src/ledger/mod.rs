//! Ledger backends
//!
//! One interface, two variants: `Simulated` fabricates balances and
//! confirmations entirely in-process; `ChainBacked` reads real balances
//! from an Aptos fullnode REST endpoint. Submission is simulated in both
//! variants because transaction signing lives in the external wallet
//! provider, not in this service.

pub mod chain;
pub mod simulated;

pub use chain::ChainLedger;
pub use simulated::SimulatedLedger;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{AppConfig, BackendKind};
use crate::error::WalletError;
use crate::provider::ProviderKind;

/// What a submitted transaction resolves to.
#[derive(Clone, Debug, Serialize)]
pub struct TxReceipt {
    pub hash: String,
    pub block_height: u64,
    pub success: bool,
}

pub enum LedgerBackend {
    Simulated(SimulatedLedger),
    ChainBacked(ChainLedger),
}

impl LedgerBackend {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.backend {
            BackendKind::Simulated => {
                LedgerBackend::Simulated(SimulatedLedger::new(config.simulated_latency_ms))
            }
            BackendKind::ChainBacked => LedgerBackend::ChainBacked(ChainLedger::new(
                config.node_url.clone(),
                config.simulated_latency_ms,
            )),
        }
    }

    /// Resolve the account address the given provider would expose.
    pub async fn account_address(&self, provider: ProviderKind) -> Result<String, WalletError> {
        match self {
            LedgerBackend::Simulated(sim) => sim.account_address(provider).await,
            LedgerBackend::ChainBacked(chain) => chain.account_address(provider).await,
        }
    }

    /// Token-symbol to amount map for the account.
    pub async fn fetch_balances(
        &self,
        address: &str,
    ) -> Result<BTreeMap<String, f64>, WalletError> {
        match self {
            LedgerBackend::Simulated(sim) => sim.fetch_balances(address).await,
            LedgerBackend::ChainBacked(chain) => chain.fetch_balances(address).await,
        }
    }

    /// Submit the lock transaction and await confirmation.
    pub async fn submit_lock(
        &self,
        owner: &str,
        amount: f64,
        token: &str,
        heir: &str,
        limit_minutes: u32,
    ) -> Result<TxReceipt, WalletError> {
        match self {
            LedgerBackend::Simulated(sim) => {
                sim.submit_lock(owner, amount, token, heir, limit_minutes).await
            }
            LedgerBackend::ChainBacked(chain) => {
                chain.submit_lock(owner, amount, token, heir, limit_minutes).await
            }
        }
    }

    /// Submit a heartbeat transaction and await confirmation.
    pub async fn submit_heartbeat(&self, owner: &str) -> Result<TxReceipt, WalletError> {
        match self {
            LedgerBackend::Simulated(sim) => sim.submit_heartbeat(owner).await,
            LedgerBackend::ChainBacked(chain) => chain.submit_heartbeat(owner).await,
        }
    }
}
