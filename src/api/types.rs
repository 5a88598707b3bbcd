use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Network;
use crate::provider::ProviderKind;
use crate::session::SessionState;

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    /// Provider name, e.g. "petra"; omitted means highest-ranked detected.
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectCustomRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct LockAssetRequest {
    pub amount: f64,
    pub token: String,
    pub heir: String,
    pub inactivity_limit_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub struct FaucetRequest {
    pub address: String,
    #[serde(default = "default_faucet_amount")]
    pub amount_apt: f64,
}

fn default_faucet_amount() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub is_connected: bool,
    pub address: Option<String>,
    pub wallet_name: Option<String>,
    pub provider: Option<ProviderKind>,
    pub network: Network,
    pub balances: BTreeMap<String, f64>,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        Self {
            is_connected: state.wallet.is_connected,
            address: state.wallet.address.clone(),
            wallet_name: state.wallet.wallet_name.clone(),
            provider: state.wallet.provider,
            network: state.wallet.network,
            balances: state.wallet.balances.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub minutes_inactive: u32,
    pub inactivity_limit_minutes: u32,
    pub expired: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearLogResponse {
    pub status: String,
}
