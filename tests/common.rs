/// Shared test infrastructure: a manager wired to the simulated ledger
/// with zero latency and tempdir-backed session storage.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use deadman_wallet::config::AppConfig;
use deadman_wallet::manager::SessionManager;
use deadman_wallet::storage::SessionStorage;
use deadman_wallet::switch::LockRequest;

pub const HEIR: &str = "0x9876543210fedcba0987654321fedcba0987654321fedcba0987654321fedcba";

pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub manager: SessionManager,
}

impl TestEnvironment {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let config = test_config(&temp_dir);
        let storage = SessionStorage::new(temp_dir.path());
        let manager = SessionManager::new_with_storage(config, storage);

        Ok(Self { temp_dir, manager })
    }

    /// A second manager over the same storage, simulating a restart.
    pub fn restarted_manager(&self) -> SessionManager {
        let config = test_config(&self.temp_dir);
        let storage = SessionStorage::new(self.temp_dir.path());
        SessionManager::new_with_storage(config, storage)
    }
}

fn test_config(temp_dir: &TempDir) -> AppConfig {
    AppConfig {
        available_providers: vec!["petra".to_string(), "martian".to_string()],
        session_dir: temp_dir.path().display().to_string(),
        simulated_latency_ms: 0,
        ..AppConfig::default()
    }
}

/// Fixed reference instant so elapsed-time assertions are exact.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn minutes(n: i64) -> Duration {
    Duration::minutes(n)
}

pub fn lock_request(amount: f64, limit_minutes: u32) -> LockRequest {
    LockRequest {
        amount,
        token: "APT".to_string(),
        heir: HEIR.to_string(),
        inactivity_limit_minutes: limit_minutes,
    }
}
