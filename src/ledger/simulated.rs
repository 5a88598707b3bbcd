use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;

use crate::error::WalletError;
use crate::ledger::TxReceipt;
use crate::provider::ProviderKind;

/// Fully in-process ledger: deterministic demo addresses and balances,
/// fabricated transaction receipts. The configured latency stands in
/// for network round trips and confirmation waits.
pub struct SimulatedLedger {
    latency: Duration,
}

impl SimulatedLedger {
    pub fn new(latency_ms: u64) -> Self {
        Self {
            latency: Duration::from_millis(latency_ms),
        }
    }

    async fn simulate_delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn account_address(&self, provider: ProviderKind) -> Result<String, WalletError> {
        self.simulate_delay().await;
        Ok(provider.demo_address().to_string())
    }

    pub async fn fetch_balances(
        &self,
        address: &str,
    ) -> Result<BTreeMap<String, f64>, WalletError> {
        log::debug!("Fetching simulated balances for {}", address);
        self.simulate_delay().await;
        Ok(demo_balances())
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
            "Simulating lock of {} {} by {} for heir {} ({} min limit)",
            amount,
            token,
            owner,
            heir,
            limit_minutes
        );
        self.simulate_delay().await;
        Ok(mock_receipt())
    }

    pub async fn submit_heartbeat(&self, owner: &str) -> Result<TxReceipt, WalletError> {
        log::debug!("Simulating heartbeat transaction for {}", owner);
        self.simulate_delay().await;
        Ok(mock_receipt())
    }
}

/// Consistent demo balances for the known tokens.
pub fn demo_balances() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("APT".to_string(), 100.0),
        ("USDC".to_string(), 2500.0),
        ("TEST".to_string(), 5000.0),
    ])
}

/// Fabricated confirmed receipt with a random hash and block height.
pub fn mock_receipt() -> TxReceipt {
    TxReceipt {
        hash: mock_tx_hash(),
        block_height: rand::thread_rng().gen_range(1..1_000_000),
        success: true,
    }
}

pub fn mock_tx_hash() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_account_address_is_deterministic_per_provider() {
        let ledger = SimulatedLedger::new(0);
        let a = ledger.account_address(ProviderKind::Petra).await.unwrap();
        let b = ledger.account_address(ProviderKind::Petra).await.unwrap();
        assert_eq!(a, b);
        assert!(crate::switch::is_valid_address(&a));
    }

    #[tokio::test]
    async fn test_balances_cover_known_tokens() {
        let ledger = SimulatedLedger::new(0);
        let balances = ledger.fetch_balances("0xabc").await.unwrap();
        for token in ["APT", "USDC", "TEST"] {
            assert!(balances.contains_key(token));
        }
    }

    #[test]
    fn test_mock_tx_hash_format() {
        let hash = mock_tx_hash();
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0x"));
    }
}
