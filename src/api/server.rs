use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::manager::SessionManager;

pub async fn start_server(addr: &str) -> anyhow::Result<()> {
    let manager = Arc::new(SessionManager::new());

    // Configure CORS based on environment
    // Set ALLOWED_ORIGINS="https://your-app.example.com" for production
    // If not set, allows any origin (development mode)
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    spawn_watchdog(manager.clone());

    let app = build_router(manager).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Route table over a shared manager. Split out from `start_server` so
/// tests can serve it on an ephemeral port without the env-driven CORS
/// layer or the watchdog task.
pub fn build_router(manager: Arc<SessionManager>) -> Router {
    Router::new()
        // Session routes
        .route("/api/session", get(handlers::get_session_handler))
        .route("/api/session/connect", post(handlers::connect_handler))
        .route(
            "/api/session/connect-custom",
            post(handlers::connect_custom_handler),
        )
        .route(
            "/api/session/disconnect",
            post(handlers::disconnect_handler),
        )
        .route(
            "/api/session/refresh-balances",
            post(handlers::refresh_balances_handler),
        )
        // Dead-man's-switch routes
        .route("/api/assets/lock", post(handlers::lock_asset_handler))
        .route("/api/assets", get(handlers::list_assets_handler))
        .route("/api/heartbeat", post(handlers::heartbeat_handler))
        .route(
            "/api/simulate-inactivity",
            post(handlers::simulate_inactivity_handler),
        )
        .route("/api/status", get(handlers::status_handler))
        // Action log
        .route("/api/log", get(handlers::get_log_handler))
        .route("/api/log/clear", post(handlers::clear_log_handler))
        // Faucet
        .route("/api/faucet", post(handlers::faucet_handler))
        .with_state(manager)
}

/// Periodic watchdog tick. Lives until the process exits; the switch
/// state it evaluates is in-memory, so there is nothing to tear down.
fn spawn_watchdog(manager: Arc<SessionManager>) {
    let period = Duration::from_secs(manager.config.watchdog_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            manager.tick(Utc::now());
        }
    });
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
