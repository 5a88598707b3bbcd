use chrono::{DateTime, Utc};

use crate::switch::registry::{AssetStatus, LockedAsset};

/// One asset flipped by a transfer pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferredAsset {
    pub amount: f64,
    pub token: String,
    pub heir: String,
}

/// Result of one transfer pass over the registry.
#[derive(Clone, Debug, Default)]
pub struct TransferOutcome {
    pub transferred: Vec<TransferredAsset>,
    pub total_amount: f64,
}

impl TransferOutcome {
    pub fn is_empty(&self) -> bool {
        self.transferred.is_empty()
    }
}

/// Flip every still-locked asset to `Transferred`, stamping the transfer
/// time. Already-transferred assets are untouched, which makes the pass
/// idempotent: the watchdog may invoke it on every tick while the expired
/// condition persists.
pub fn execute(assets: &mut [LockedAsset], now: DateTime<Utc>) -> TransferOutcome {
    let mut outcome = TransferOutcome::default();

    for asset in assets.iter_mut() {
        if asset.status != AssetStatus::Locked {
            continue;
        }
        asset.status = AssetStatus::Transferred;
        asset.transferred_at = Some(now);
        outcome.total_amount += asset.amount;
        outcome.transferred.push(TransferredAsset {
            amount: asset.amount,
            token: asset.token.clone(),
            heir: asset.heir.clone(),
        });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switch::registry::LockRequest;

    fn locked(amount: f64, token: &str) -> LockedAsset {
        LockedAsset::new(
            &LockRequest {
                amount,
                token: token.to_string(),
                heir: format!("0x{}", "ab".repeat(32)),
                inactivity_limit_minutes: 5,
            },
            Utc::now(),
            format!("0x{}", "cd".repeat(32)),
        )
    }

    #[test]
    fn test_transfers_all_locked_assets() {
        let mut assets = vec![locked(5.0, "APT"), locked(100.0, "USDC")];
        let now = Utc::now();
        let outcome = execute(&mut assets, now);

        assert_eq!(outcome.transferred.len(), 2);
        assert_eq!(outcome.total_amount, 105.0);
        assert!(assets
            .iter()
            .all(|a| a.status == AssetStatus::Transferred && a.transferred_at == Some(now)));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut assets = vec![locked(5.0, "APT")];
        let first = execute(&mut assets, Utc::now());
        assert_eq!(first.transferred.len(), 1);

        let stamp = assets[0].transferred_at;
        let second = execute(&mut assets, Utc::now());
        assert!(second.is_empty());
        assert_eq!(assets[0].transferred_at, stamp);
    }
}
