use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::WalletError;
use crate::ledger::simulated::{demo_balances, mock_receipt};
use crate::ledger::TxReceipt;
use crate::provider::ProviderKind;

const OCTAS_PER_APT: f64 = 100_000_000.0;
const USDC_SUBUNITS: f64 = 1_000_000.0;
const TEST_SUBUNITS: f64 = 1_000_000.0;

/// Ledger backed by an Aptos fullnode REST endpoint for reads.
///
/// Balance queries hit `GET /v1/accounts/{address}/resources` and fold
/// `CoinStore` resources into the session's token map. Submission still
/// resolves to a simulated confirmation: signing belongs to the wallet
/// provider and is not performed here.
pub struct ChainLedger {
    client: reqwest::Client,
    node_url: String,
    latency: Duration,
}

#[derive(Debug, Deserialize)]
struct AccountResource {
    #[serde(rename = "type")]
    resource_type: String,
    data: serde_json::Value,
}

impl ChainLedger {
    pub fn new(node_url: String, latency_ms: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            node_url: node_url.trim_end_matches('/').to_string(),
            latency: Duration::from_millis(latency_ms),
        }
    }

    pub async fn account_address(&self, provider: ProviderKind) -> Result<String, WalletError> {
        // The injected provider owns the keys; headless, it exposes the
        // same demo account the simulated backend does.
        Ok(provider.demo_address().to_string())
    }

    pub async fn fetch_balances(
        &self,
        address: &str,
    ) -> Result<BTreeMap<String, f64>, WalletError> {
        let url = format!("{}/v1/accounts/{}/resources", self.node_url, address);
        log::debug!("Fetching account resources: {}", url);

        let resources: Vec<AccountResource> = match self.request_resources(&url).await {
            Ok(resources) => resources,
            Err(e) => {
                log::warn!("Fullnode fetch failed ({}), using demo balances", e);
                return Ok(demo_balances());
            }
        };

        Ok(balances_from_resources(&resources))
    }

    async fn request_resources(&self, url: &str) -> Result<Vec<AccountResource>, WalletError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Network(format!(
                "fullnode returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))
    }

    pub async fn submit_lock(
        &self,
        owner: &str,
        amount: f64,
        token: &str,
        heir: &str,
        limit_minutes: u32,
    ) -> Result<TxReceipt, WalletError> {
        log::debug!(
            "Submitting lock of {} {} by {} for heir {} ({} min limit)",
            amount,
            token,
            owner,
            heir,
            limit_minutes
        );
        self.simulate_confirmation().await;
        Ok(mock_receipt())
    }

    pub async fn submit_heartbeat(&self, owner: &str) -> Result<TxReceipt, WalletError> {
        log::debug!("Submitting heartbeat transaction for {}", owner);
        self.simulate_confirmation().await;
        Ok(mock_receipt())
    }

    async fn simulate_confirmation(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Fold `CoinStore` resources into the known token symbols, converting
/// from on-chain subunits (octas for APT).
fn balances_from_resources(resources: &[AccountResource]) -> BTreeMap<String, f64> {
    let mut balances = BTreeMap::from([
        ("APT".to_string(), 0.0),
        ("USDC".to_string(), 0.0),
        ("TEST".to_string(), 0.0),
    ]);

    for resource in resources {
        if !resource.resource_type.contains("CoinStore") {
            continue;
        }
        let Some(coin_type) = coin_type_param(&resource.resource_type) else {
            continue;
        };
        let raw = resource
            .data
            .get("coin")
            .and_then(|coin| coin.get("value"))
            .and_then(|value| value.as_str())
            .and_then(|value| value.parse::<u64>().ok());
        let Some(raw) = raw else {
            log::debug!("Skipping malformed coin resource: {}", resource.resource_type);
            continue;
        };

        let lowered = coin_type.to_lowercase();
        if lowered.contains("aptos_coin") || lowered.contains("aptoscoin") {
            balances.insert("APT".to_string(), raw as f64 / OCTAS_PER_APT);
        } else if lowered.contains("usdc") {
            balances.insert("USDC".to_string(), raw as f64 / USDC_SUBUNITS);
        } else if lowered.contains("test") {
            balances.insert("TEST".to_string(), raw as f64 / TEST_SUBUNITS);
        }
    }

    balances
}

/// Extract the generic parameter of a `CoinStore<...>` resource type.
fn coin_type_param(resource_type: &str) -> Option<&str> {
    let start = resource_type.find('<')? + 1;
    let end = resource_type.rfind('>')?;
    resource_type.get(start..end)
}
