use thiserror::Error;

use crate::api::ApiError;

/// Client-side precondition failures. These never reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please choose a coin")]
    MissingSelection,
    #[error("{0} is already being tracked")]
    AlreadyTracked(String),
    #[error("{0} is not an available coin")]
    UnsupportedCoin(String),
    #[error("No tracked coin with id {0}")]
    UnknownCoin(i64),
    #[error("A trade cycle is already running")]
    TradeInProgress,
}

/// Errors returned by dashboard write operations
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Fetch failed: {0}")]
    Fetch(#[from] ApiError),
}

/// Extract clean error message from a backend error body
///
/// The backend answers errors with FastAPI bodies like:
/// `{"detail": "Coin already exists: BTC"}`
/// or, for request validation:
/// `{"detail": [{"loc": ["query", "limit"], "msg": "ensure this value is less than or equal to 100"}]}`
///
/// Returns only the meaningful message:
/// "Coin already exists: BTC"
pub fn extract_clean_error(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };

    match json.get("detail").or_else(|| json.get("message")) {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| entry.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        _ => trimmed.to_string(),
    }
}
