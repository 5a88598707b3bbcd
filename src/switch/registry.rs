use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WalletError;
use crate::switch::heartbeat::MAX_INACTIVITY_MINUTES;

/// Aptos account address: "0x" followed by 64 hex characters.
pub const ADDRESS_LEN: usize = 66;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Locked,
    /// Terminal: no heartbeat can revert a transferred asset.
    Transferred,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LockedAsset {
    pub id: Uuid,
    pub amount: f64,
    pub token: String,
    pub heir: String,
    pub inactivity_limit_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub status: AssetStatus,
    pub transaction_hash: Option<String>,
    pub transferred_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LockRequest {
    pub amount: f64,
    pub token: String,
    pub heir: String,
    pub inactivity_limit_minutes: u32,
}

/// Check the account address format (fixed prefix, fixed length, hex body).
pub fn is_valid_address(address: &str) -> bool {
    address.len() == ADDRESS_LEN
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Shortened address for log messages, e.g. "0x1a2b...7890".
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Validate a lock request against the caller's session.
///
/// Runs before any state change; every violation is a recoverable
/// `Validation` error surfaced to the user.
pub fn validate_lock(
    req: &LockRequest,
    own_address: &str,
    balances: &BTreeMap<String, f64>,
) -> Result<(), WalletError> {
    if !(req.amount > 0.0) {
        return Err(WalletError::Validation(
            "Please enter a valid amount".to_string(),
        ));
    }

    let available = balances.get(&req.token).copied().unwrap_or(0.0);
    if req.amount > available {
        return Err(WalletError::Validation(format!(
            "Insufficient {} balance: have {:.6}, tried to lock {}",
            req.token, available, req.amount
        )));
    }

    if !is_valid_address(&req.heir) {
        return Err(WalletError::Validation(
            "Invalid heir wallet address format".to_string(),
        ));
    }

    if req.heir.eq_ignore_ascii_case(own_address) {
        return Err(WalletError::Validation(
            "Heir address cannot be the same as your wallet address".to_string(),
        ));
    }

    if req.inactivity_limit_minutes < 1 {
        return Err(WalletError::Validation(
            "Please enter a valid inactivity limit".to_string(),
        ));
    }
    if req.inactivity_limit_minutes > MAX_INACTIVITY_MINUTES {
        return Err(WalletError::Validation(format!(
            "Inactivity limit cannot exceed 24 hours ({} minutes)",
            MAX_INACTIVITY_MINUTES
        )));
    }

    Ok(())
}

impl LockedAsset {
    pub fn new(req: &LockRequest, created_at: DateTime<Utc>, transaction_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: req.amount,
            token: req.token.clone(),
            heir: req.heir.clone(),
            inactivity_limit_minutes: req.inactivity_limit_minutes,
            created_at,
            status: AssetStatus::Locked,
            transaction_hash: Some(transaction_hash),
            transferred_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN: &str = "0x1a2b3c4d5e6f7890abcdef1234567890abcdef1234567890abcdef1234567890";
    const HEIR: &str = "0x9876543210fedcba0987654321fedcba0987654321fedcba0987654321fedcba";

    fn balances() -> BTreeMap<String, f64> {
        BTreeMap::from([("APT".to_string(), 10.0)])
    }

    fn valid_request() -> LockRequest {
        LockRequest {
            amount: 5.0,
            token: "APT".to_string(),
            heir: HEIR.to_string(),
            inactivity_limit_minutes: 5,
        }
    }

    #[test]
    fn test_address_format() {
        assert!(is_valid_address(OWN));
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address(&OWN.replace("0x", "1x")));
        assert!(!is_valid_address(&format!("0x{}", "g".repeat(64))));
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_lock(&valid_request(), OWN, &balances()).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut req = valid_request();
        req.amount = 0.0;
        assert!(matches!(
            validate_lock(&req, OWN, &balances()),
            Err(WalletError::Validation(_))
        ));
        req.amount = -1.0;
        assert!(validate_lock(&req, OWN, &balances()).is_err());
    }

    #[test]
    fn test_rejects_amount_over_balance() {
        let mut req = valid_request();
        req.amount = 10.5;
        assert!(validate_lock(&req, OWN, &balances()).is_err());
    }

    #[test]
    fn test_rejects_unknown_token_as_zero_balance() {
        let mut req = valid_request();
        req.token = "DOGE".to_string();
        assert!(validate_lock(&req, OWN, &balances()).is_err());
    }

    #[test]
    fn test_rejects_bad_heir_format() {
        let mut req = valid_request();
        req.heir = "0xshort".to_string();
        assert!(validate_lock(&req, OWN, &balances()).is_err());
    }

    #[test]
    fn test_rejects_heir_equal_to_self() {
        let mut req = valid_request();
        req.heir = OWN.to_uppercase().replace("0X", "0x");
        assert!(validate_lock(&req, OWN, &balances()).is_err());
    }

    #[test]
    fn test_rejects_limit_out_of_bounds() {
        let mut req = valid_request();
        req.inactivity_limit_minutes = 0;
        assert!(validate_lock(&req, OWN, &balances()).is_err());
        req.inactivity_limit_minutes = 1441;
        assert!(validate_lock(&req, OWN, &balances()).is_err());
        req.inactivity_limit_minutes = 1440;
        assert!(validate_lock(&req, OWN, &balances()).is_ok());
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address(HEIR), "0x9876...dcba");
    }
}
