mod common;

use chrono::Utc;
use common::{lock_request, minutes, t0, TestEnvironment, HEIR};
use deadman_wallet::error::WalletError;
use deadman_wallet::switch::AssetStatus;

#[tokio::test]
async fn test_lock_starts_with_zero_minutes_inactive() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;

    let asset = env.manager.lock_asset(lock_request(5.0, 5), t0()).await?;
    assert_eq!(asset.status, AssetStatus::Locked);
    assert_eq!(asset.heir, HEIR);
    assert!(asset.transaction_hash.is_some());

    assert_eq!(env.manager.minutes_inactive(t0()), 0);

    // Cached balance bookkeeping: demo APT balance is 100.
    let snapshot = env.manager.snapshot();
    assert_eq!(snapshot.wallet.balances["APT"], 95.0);
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_defers_transfer_then_expiry_fires_once() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;
    env.manager.lock_asset(lock_request(5.0, 5), t0()).await?;

    // Heartbeat at T0+4min keeps the watchdog quiet.
    env.manager.send_heartbeat(t0() + minutes(4)).await?;
    env.manager.tick(t0() + minutes(4));
    assert_eq!(
        env.manager.locked_assets()[0].status,
        AssetStatus::Locked
    );

    // No further heartbeat: at T0+10min the limit (5 min since the
    // T0+4min heartbeat) has elapsed.
    env.manager.tick(t0() + minutes(10));
    let assets = env.manager.locked_assets();
    assert_eq!(assets[0].status, AssetStatus::Transferred);
    assert_eq!(assets[0].transferred_at, Some(t0() + minutes(10)));

    // A second tick while still expired is a no-op.
    let log_len = env.manager.action_log().len();
    env.manager.tick(t0() + minutes(11));
    assert_eq!(env.manager.locked_assets()[0].transferred_at, Some(t0() + minutes(10)));
    assert_eq!(env.manager.action_log().len(), log_len);
    Ok(())
}

#[tokio::test]
async fn test_exactly_equal_elapsed_counts_as_expired() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;
    env.manager.lock_asset(lock_request(1.0, 5), t0()).await?;

    env.manager.tick(t0() + minutes(5));
    assert_eq!(
        env.manager.locked_assets()[0].status,
        AssetStatus::Transferred
    );
    Ok(())
}

#[tokio::test]
async fn test_heartbeat_resets_minutes_inactive() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;
    env.manager.lock_asset(lock_request(1.0, 30), t0()).await?;

    let later = t0() + minutes(12);
    assert_eq!(env.manager.minutes_inactive(later), 12);

    let state = env.manager.send_heartbeat(later).await?;
    assert_eq!(state.heartbeat.last_heartbeat, Some(later));
    assert_eq!(env.manager.minutes_inactive(later), 0);
    Ok(())
}

#[tokio::test]
async fn test_transfer_is_terminal_despite_later_heartbeat() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;
    env.manager.lock_asset(lock_request(2.0, 5), t0()).await?;

    env.manager.tick(t0() + minutes(6));
    assert_eq!(
        env.manager.locked_assets()[0].status,
        AssetStatus::Transferred
    );

    // Heartbeats still work (the registry is non-empty) but cannot
    // revert a transferred asset.
    env.manager.send_heartbeat(t0() + minutes(7)).await?;
    env.manager.tick(t0() + minutes(20));
    let assets = env.manager.locked_assets();
    assert_eq!(assets[0].status, AssetStatus::Transferred);
    assert_eq!(assets[0].transferred_at, Some(t0() + minutes(6)));
    Ok(())
}

#[tokio::test]
async fn test_lock_rejects_heir_equal_to_self_without_mutation() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    let state = env.manager.connect(None, t0()).await?;
    let own_address = state.wallet.address.unwrap();
    let balance_before = state.wallet.balances["APT"];

    let mut req = lock_request(5.0, 5);
    req.heir = own_address;
    let result = env.manager.lock_asset(req, t0()).await;

    assert!(matches!(result, Err(WalletError::Validation(_))));
    assert!(env.manager.locked_assets().is_empty());
    assert_eq!(
        env.manager.snapshot().wallet.balances["APT"],
        balance_before
    );
    Ok(())
}

#[tokio::test]
async fn test_lock_validation_matrix() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;

    let rejected = [
        lock_request(0.0, 5),
        lock_request(-3.0, 5),
        lock_request(100.5, 5), // demo APT balance is 100
        lock_request(5.0, 0),
        lock_request(5.0, 1441),
    ];
    for req in rejected {
        assert!(matches!(
            env.manager.lock_asset(req, t0()).await,
            Err(WalletError::Validation(_))
        ));
    }

    let mut bad_heir = lock_request(5.0, 5);
    bad_heir.heir = "0xtooshort".to_string();
    assert!(matches!(
        env.manager.lock_asset(bad_heir, t0()).await,
        Err(WalletError::Validation(_))
    ));

    assert!(env.manager.locked_assets().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_operations_require_connection_and_locks() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;

    assert!(matches!(
        env.manager.lock_asset(lock_request(5.0, 5), t0()).await,
        Err(WalletError::NotConnected)
    ));
    assert!(matches!(
        env.manager.send_heartbeat(t0()).await,
        Err(WalletError::NotConnected)
    ));

    env.manager.connect(None, t0()).await?;
    assert!(matches!(
        env.manager.send_heartbeat(t0()).await,
        Err(WalletError::NoLockedAssets)
    ));
    assert!(matches!(
        env.manager.simulate_inactivity(t0()),
        Err(WalletError::NoLockedAssets)
    ));
    Ok(())
}

#[tokio::test]
async fn test_watchdog_is_idle_while_disconnected() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;
    env.manager.lock_asset(lock_request(5.0, 5), t0()).await?;

    env.manager.disconnect(t0() + minutes(1));
    env.manager.tick(t0() + minutes(30));

    // Locked assets survive the disconnect but nothing fires.
    assert_eq!(env.manager.locked_assets()[0].status, AssetStatus::Locked);
    Ok(())
}

#[tokio::test]
async fn test_simulate_inactivity_triggers_transfer() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;
    env.manager.lock_asset(lock_request(5.0, 5), t0()).await?;

    let state = env.manager.simulate_inactivity(t0())?;
    assert_eq!(state.heartbeat.minutes_inactive(t0()), 6);

    env.manager.tick(t0());
    assert_eq!(
        env.manager.locked_assets()[0].status,
        AssetStatus::Transferred
    );
    Ok(())
}

#[tokio::test]
async fn test_expiry_transfers_every_locked_asset() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.manager.connect(None, t0()).await?;
    env.manager.lock_asset(lock_request(5.0, 10), t0()).await?;

    let mut usdc = lock_request(250.0, 10);
    usdc.token = "USDC".to_string();
    env.manager.lock_asset(usdc, t0() + minutes(1)).await?;

    env.manager.tick(t0() + minutes(11));
    let assets = env.manager.locked_assets();
    assert_eq!(assets.len(), 2);
    assert!(assets
        .iter()
        .all(|asset| asset.status == AssetStatus::Transferred));

    // Per-asset entries plus one completion summary.
    let log = env.manager.action_log();
    let transferred_entries = log.iter().filter(|e| e.action == "Transferred").count();
    assert_eq!(transferred_entries, 2);
    assert!(log.iter().any(|e| e.action == "Complete"));
    Ok(())
}
