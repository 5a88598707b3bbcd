use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No wallet connected")]
    NotConnected,

    #[error("No assets locked")]
    NoLockedAssets,

    #[error("Wallet provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WalletError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::NotConnected => (StatusCode::CONFLICT, self.to_string()),
            WalletError::NoLockedAssets => (StatusCode::CONFLICT, self.to_string()),
            WalletError::ProviderNotAvailable(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::Network(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            WalletError::Transaction(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
