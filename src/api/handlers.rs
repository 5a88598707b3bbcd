use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::error::WalletError;
use crate::faucet::FaucetResult;
use crate::manager::SessionManager;
use crate::provider::ProviderKind;
use crate::switch::{watchdog, ActionLogEntry, LockRequest, LockedAsset, WatchdogVerdict};

use super::types::{
    ClearLogResponse, ConnectCustomRequest, ConnectRequest, FaucetRequest, LockAssetRequest,
    SessionView, StatusView,
};

pub async fn connect_handler(
    State(manager): State<Arc<SessionManager>>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<SessionView>, WalletError> {
    let preferred = match req.provider.as_deref() {
        None | Some("") => None,
        Some(name) => Some(ProviderKind::parse(name).ok_or_else(|| {
            WalletError::ProviderNotAvailable(name.to_string())
        })?),
    };

    let state = manager.connect(preferred, Utc::now()).await?;
    Ok(Json(SessionView::from(&state)))
}

pub async fn connect_custom_handler(
    State(manager): State<Arc<SessionManager>>,
    Json(req): Json<ConnectCustomRequest>,
) -> Result<Json<SessionView>, WalletError> {
    let state = manager.connect_custom(&req.address, Utc::now()).await?;
    Ok(Json(SessionView::from(&state)))
}

pub async fn disconnect_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Json<SessionView> {
    let state = manager.disconnect(Utc::now());
    Json(SessionView::from(&state))
}

pub async fn get_session_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Json<SessionView> {
    Json(SessionView::from(&manager.snapshot()))
}

pub async fn refresh_balances_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Result<Json<SessionView>, WalletError> {
    let state = manager.refresh_balances(Utc::now()).await?;
    Ok(Json(SessionView::from(&state)))
}

pub async fn lock_asset_handler(
    State(manager): State<Arc<SessionManager>>,
    Json(req): Json<LockAssetRequest>,
) -> Result<Json<LockedAsset>, WalletError> {
    let lock_req = LockRequest {
        amount: req.amount,
        token: req.token,
        heir: req.heir,
        inactivity_limit_minutes: req.inactivity_limit_minutes,
    };

    let asset = manager.lock_asset(lock_req, Utc::now()).await?;
    Ok(Json(asset))
}

pub async fn list_assets_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Json<Vec<LockedAsset>> {
    Json(manager.locked_assets())
}

pub async fn heartbeat_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Result<Json<StatusView>, WalletError> {
    let now = Utc::now();
    manager.send_heartbeat(now).await?;
    Ok(Json(status_view(&manager)))
}

pub async fn simulate_inactivity_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Result<Json<StatusView>, WalletError> {
    let now = Utc::now();
    manager.simulate_inactivity(now)?;
    // Evaluate immediately so the demo does not wait for the next tick.
    manager.tick(now);
    Ok(Json(status_view(&manager)))
}

pub async fn status_handler(State(manager): State<Arc<SessionManager>>) -> Json<StatusView> {
    Json(status_view(&manager))
}

pub async fn get_log_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Json<Vec<ActionLogEntry>> {
    Json(manager.action_log())
}

pub async fn clear_log_handler(
    State(manager): State<Arc<SessionManager>>,
) -> Json<ClearLogResponse> {
    manager.clear_log(Utc::now());
    Json(ClearLogResponse {
        status: "cleared".to_string(),
    })
}

pub async fn faucet_handler(
    State(manager): State<Arc<SessionManager>>,
    Json(req): Json<FaucetRequest>,
) -> Result<Json<FaucetResult>, WalletError> {
    let result = manager
        .fund_from_faucet(&req.address, req.amount_apt, Utc::now())
        .await?;
    Ok(Json(result))
}

fn status_view(manager: &SessionManager) -> StatusView {
    let now = Utc::now();
    let snapshot = manager.snapshot();
    let verdict = watchdog::evaluate(snapshot.wallet.is_connected, &snapshot.heartbeat, now);

    StatusView {
        last_heartbeat: snapshot.heartbeat.last_heartbeat,
        minutes_inactive: snapshot.heartbeat.minutes_inactive(now),
        inactivity_limit_minutes: snapshot.heartbeat.inactivity_limit_minutes,
        expired: matches!(verdict, WatchdogVerdict::Expired { .. }),
    }
}
