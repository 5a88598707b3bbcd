use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// Session Manager - Orchestration Layer
///
/// Owns the session state and coordinates the switch engine, ledger
/// backend, faucet client and session storage. All state mutations go
/// through `mutate`, which clones the current state, applies the edit
/// and swaps the whole snapshot in, so concurrent readers (the watchdog
/// tick included) always see a consistent state.
use crate::config::AppConfig;
use crate::error::WalletError;
use crate::faucet::{FaucetClient, FaucetResult};
use crate::ledger::LedgerBackend;
use crate::provider::{detect_providers, select_provider, ProviderKind};
use crate::session::{zero_balances, SessionState, WalletSession};
use crate::storage::{SessionStorage, StoredSession};
use crate::switch::{
    registry, short_address, transfer, watchdog, ActionLogEntry, LockRequest, LockedAsset,
    Severity, WatchdogVerdict,
};

pub struct SessionManager {
    pub config: AppConfig,
    storage: SessionStorage,
    ledger: LedgerBackend,
    faucet: FaucetClient,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new() -> Self {
        let config = AppConfig::from_env();
        let storage = SessionStorage::new(config.session_dir.clone());
        Self::new_with_storage(config, storage)
    }

    /// Create a manager with explicit config and storage (for testing).
    pub fn new_with_storage(config: AppConfig, storage: SessionStorage) -> Self {
        let ledger = LedgerBackend::from_config(&config);
        let mut state = SessionState::new(config.network);

        // Session continuity: restore the connection flag and address
        // saved by a previous run. Balances are refreshed on demand.
        match storage.load() {
            Ok(stored) if stored.was_connected => {
                state.wallet = WalletSession {
                    address: stored.address.clone(),
                    is_connected: stored.address.is_some(),
                    balances: zero_balances(),
                    network: stored.network.unwrap_or(config.network),
                    provider: stored.provider,
                    wallet_name: stored.provider.map(|p| p.display_name().to_string()),
                };
                if let Some(address) = &stored.address {
                    log::info!("Restored session for {}", short_address(address));
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Could not load stored session: {}", e),
        }

        Self {
            config,
            storage,
            ledger,
            faucet: FaucetClient::new(),
            state: RwLock::new(state),
        }
    }

    // ============================================================================
    // State access
    // ============================================================================

    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Copy-on-write mutation: edit a clone, swap it in whole.
    fn mutate<R>(&self, edit: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut next = guard.clone();
        let result = edit(&mut next);
        *guard = next;
        result
    }

    fn log(&self, now: DateTime<Utc>, action: &str, message: &str, severity: Severity) {
        self.mutate(|state| state.action_log.append(now, action, message, severity));
    }

    /// Convert an operation failure into a log entry, then propagate it.
    fn fail(&self, now: DateTime<Utc>, error: WalletError) -> WalletError {
        self.log(now, "Error", &error.to_string(), Severity::Error);
        error
    }

    fn persist_session(&self, state: &SessionState) {
        let stored = StoredSession {
            was_connected: state.wallet.is_connected,
            address: state.wallet.address.clone(),
            network: Some(state.wallet.network),
            provider: state.wallet.provider,
        };
        if let Err(e) = self.storage.save(&stored) {
            log::warn!("Could not persist session: {}", e);
        }
    }

    // ============================================================================
    // Wallet session
    // ============================================================================

    pub async fn connect(
        &self,
        preferred: Option<ProviderKind>,
        now: DateTime<Utc>,
    ) -> Result<SessionState, WalletError> {
        let detected = detect_providers(&self.config.available_providers);
        let provider = select_provider(&detected, preferred).map_err(|e| self.fail(now, e))?;

        self.log(
            now,
            "Connecting",
            &format!("Connecting to {}...", provider.display_name()),
            Severity::Info,
        );

        let address = self
            .ledger
            .account_address(provider)
            .await
            .map_err(|e| self.fail(now, e))?;

        self.mutate(|state| {
            state.wallet = WalletSession {
                address: Some(address.clone()),
                is_connected: true,
                balances: zero_balances(),
                network: state.wallet.network,
                provider: Some(provider),
                wallet_name: Some(provider.display_name().to_string()),
            };
            state.action_log.append(
                now,
                "Success",
                &format!(
                    "{} connected: {}",
                    provider.display_name(),
                    short_address(&address)
                ),
                Severity::Success,
            );
        });

        self.fetch_and_apply_balances(&address, now).await;
        self.persist_session(&self.snapshot());
        Ok(self.snapshot())
    }

    /// Connect with a user-supplied address instead of a detected provider.
    pub async fn connect_custom(
        &self,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionState, WalletError> {
        if !registry::is_valid_address(address) {
            return Err(self.fail(
                now,
                WalletError::Validation("Invalid wallet address format".to_string()),
            ));
        }

        self.mutate(|state| {
            state.wallet = WalletSession {
                address: Some(address.to_string()),
                is_connected: true,
                balances: zero_balances(),
                network: state.wallet.network,
                provider: None,
                wallet_name: Some("Custom Wallet".to_string()),
            };
            state.action_log.append(
                now,
                "Success",
                &format!("Custom Wallet connected: {}", short_address(address)),
                Severity::Success,
            );
        });

        self.fetch_and_apply_balances(address, now).await;
        self.persist_session(&self.snapshot());
        Ok(self.snapshot())
    }

    /// Clear the wallet session. Locked assets and the action log stay:
    /// they are session history, and the watchdog goes idle anyway while
    /// disconnected. The persisted continuity file is removed so the
    /// next run starts disconnected.
    pub fn disconnect(&self, now: DateTime<Utc>) -> SessionState {
        let state = self.mutate(|state| {
            state.wallet = WalletSession::disconnected(state.wallet.network);
            state
                .action_log
                .append(now, "Wallet", "Wallet disconnected", Severity::Info);
            state.clone()
        });
        if let Err(e) = self.storage.clear() {
            log::warn!("Could not clear stored session: {}", e);
        }
        state
    }

    pub async fn refresh_balances(&self, now: DateTime<Utc>) -> Result<SessionState, WalletError> {
        let address = self
            .snapshot()
            .wallet
            .address
            .ok_or_else(|| self.fail(now, WalletError::NotConnected))?;
        self.fetch_and_apply_balances(&address, now).await;
        Ok(self.snapshot())
    }

    async fn fetch_and_apply_balances(&self, address: &str, now: DateTime<Utc>) {
        match self.ledger.fetch_balances(address).await {
            Ok(balances) => self.mutate(|state| {
                let summary = balances
                    .iter()
                    .map(|(token, amount)| format!("{}={:.6}", token, amount))
                    .collect::<Vec<_>>()
                    .join(", ");
                state.wallet.balances = balances;
                state.action_log.append(
                    now,
                    "Balance",
                    &format!("Fetched balances: {}", summary),
                    Severity::Success,
                );
            }),
            Err(e) => {
                log::warn!("Balance refresh failed: {}", e);
                self.log(
                    now,
                    "Error",
                    "Failed to update balances",
                    Severity::Error,
                );
            }
        }
    }

    // ============================================================================
    // Dead-man's switch
    // ============================================================================

    pub async fn lock_asset(
        &self,
        req: LockRequest,
        now: DateTime<Utc>,
    ) -> Result<LockedAsset, WalletError> {
        let snapshot = self.snapshot();
        if !snapshot.wallet.is_connected {
            return Err(self.fail(now, WalletError::NotConnected));
        }
        let own_address = snapshot.wallet.address.clone().unwrap_or_default();

        registry::validate_lock(&req, &own_address, &snapshot.wallet.balances)
            .map_err(|e| self.fail(now, e))?;

        self.log(
            now,
            "Processing",
            &format!("Locking {} {}...", req.amount, req.token),
            Severity::Info,
        );

        let receipt = self
            .ledger
            .submit_lock(
                &own_address,
                req.amount,
                &req.token,
                &req.heir,
                req.inactivity_limit_minutes,
            )
            .await
            .map_err(|e| self.fail(now, e))?;

        if !receipt.success {
            return Err(self.fail(
                now,
                WalletError::Transaction("lock transaction not confirmed".to_string()),
            ));
        }

        let asset = LockedAsset::new(&req, now, receipt.hash.clone());
        self.mutate(|state| {
            state.locked_assets.push(asset.clone());
            state.heartbeat.last_heartbeat = Some(now);
            state.heartbeat.inactivity_limit_minutes = req.inactivity_limit_minutes;
            if let Some(balance) = state.wallet.balances.get_mut(&req.token) {
                *balance -= req.amount;
            }
            state.action_log.append(
                now,
                "Success",
                &format!(
                    "Locked {} {} for heir {}",
                    req.amount,
                    req.token,
                    short_address(&req.heir)
                ),
                Severity::Success,
            );
            state.action_log.append(
                now,
                "Transaction",
                &format!("Hash: {}...", &receipt.hash[..20.min(receipt.hash.len())]),
                Severity::Info,
            );
        });

        Ok(asset)
    }

    pub async fn send_heartbeat(&self, now: DateTime<Utc>) -> Result<SessionState, WalletError> {
        let snapshot = self.snapshot();
        if !snapshot.wallet.is_connected {
            return Err(self.fail(now, WalletError::NotConnected));
        }
        if snapshot.locked_assets.is_empty() {
            return Err(self.fail(now, WalletError::NoLockedAssets));
        }
        let address = snapshot.wallet.address.clone().unwrap_or_default();

        self.log(now, "Processing", "Sending heartbeat...", Severity::Info);

        let receipt = self
            .ledger
            .submit_heartbeat(&address)
            .await
            .map_err(|e| self.fail(now, e))?;

        if !receipt.success {
            return Err(self.fail(
                now,
                WalletError::Transaction("heartbeat transaction not confirmed".to_string()),
            ));
        }

        let state = self.mutate(|state| {
            state.heartbeat.record(now);
            state.action_log.append(
                now,
                "Success",
                &format!("Heartbeat sent at {}", now.format("%H:%M:%S")),
                Severity::Success,
            );
            state.action_log.append(
                now,
                "Transaction",
                &format!("Hash: {}...", &receipt.hash[..20.min(receipt.hash.len())]),
                Severity::Info,
            );
            state.clone()
        });
        Ok(state)
    }

    /// Demo hook: rewind the last heartbeat past the inactivity limit.
    pub fn simulate_inactivity(&self, now: DateTime<Utc>) -> Result<SessionState, WalletError> {
        let snapshot = self.snapshot();
        if !snapshot.wallet.is_connected {
            return Err(self.fail(now, WalletError::NotConnected));
        }
        if snapshot.locked_assets.is_empty() {
            return Err(self.fail(now, WalletError::NoLockedAssets));
        }
        if snapshot.heartbeat.last_heartbeat.is_none() {
            return Err(self.fail(
                now,
                WalletError::Validation(
                    "No heartbeat recorded. Please send heartbeat first.".to_string(),
                ),
            ));
        }

        let state = self.mutate(|state| {
            let minutes = state.heartbeat.rewind_past_limit(now);
            state.action_log.append(
                now,
                "Simulation",
                &format!("Set last heartbeat to {} minutes ago", minutes),
                Severity::Warning,
            );
            state.clone()
        });
        Ok(state)
    }

    /// Watchdog evaluation; invoked by the periodic tick.
    ///
    /// Side effects only: when the inactivity limit has been reached,
    /// every still-locked asset is flipped to transferred and logged.
    /// Transfer execution is idempotent per asset, so re-entering the
    /// expired branch on subsequent ticks is a no-op.
    pub fn tick(&self, now: DateTime<Utc>) {
        let snapshot = self.snapshot();
        let verdict = watchdog::evaluate(snapshot.wallet.is_connected, &snapshot.heartbeat, now);

        match verdict {
            WatchdogVerdict::Idle => {}
            WatchdogVerdict::Active { minutes_inactive } => {
                log::debug!(
                    "User active ({} min since last heartbeat, limit {} min)",
                    minutes_inactive,
                    snapshot.heartbeat.inactivity_limit_minutes
                );
            }
            WatchdogVerdict::Expired { minutes_inactive } => {
                if !snapshot.has_locked_assets() {
                    return;
                }
                log::info!(
                    "Inactivity limit reached ({} min >= {} min), transferring locked assets",
                    minutes_inactive,
                    snapshot.heartbeat.inactivity_limit_minutes
                );
                self.mutate(|state| {
                    let outcome = transfer::execute(&mut state.locked_assets, now);
                    for moved in &outcome.transferred {
                        state.action_log.append(
                            now,
                            "Transferred",
                            &format!(
                                "{} {} transferred to heir {}",
                                moved.amount,
                                moved.token,
                                short_address(&moved.heir)
                            ),
                            Severity::Warning,
                        );
                    }
                    if !outcome.is_empty() {
                        state.action_log.append(
                            now,
                            "Complete",
                            &format!(
                                "User inactive: total of {} in locked assets transferred to heir",
                                outcome.total_amount
                            ),
                            Severity::Warning,
                        );
                    }
                });
            }
        }
    }

    pub fn minutes_inactive(&self, now: DateTime<Utc>) -> u32 {
        self.snapshot().heartbeat.minutes_inactive(now)
    }

    pub fn clear_log(&self, now: DateTime<Utc>) {
        self.mutate(|state| state.action_log.clear(now));
    }

    pub fn action_log(&self) -> Vec<ActionLogEntry> {
        self.snapshot().action_log.entries().to_vec()
    }

    pub fn locked_assets(&self) -> Vec<LockedAsset> {
        self.snapshot().locked_assets
    }

    // ============================================================================
    // Faucet
    // ============================================================================

    pub async fn fund_from_faucet(
        &self,
        address: &str,
        amount_apt: f64,
        now: DateTime<Utc>,
    ) -> Result<FaucetResult, WalletError> {
        let result = self
            .faucet
            .fund(address, amount_apt)
            .await
            .map_err(|e| self.fail(now, e))?;

        self.log(
            now,
            "Faucet",
            &format!(
                "Received {} APT via {}",
                result.amount_apt, result.faucet_used
            ),
            Severity::Success,
        );
        Ok(result)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
