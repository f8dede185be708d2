use thiserror::Error;

/// Comprehensive error type for backend operations.
///
/// Every variant is a "fetch failed" to the dashboard; the split only
/// exists so logs and notifications can say what went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 409 Conflict
    #[error("Conflict: {0}")]
    Conflict(String),
    /// 422 Unprocessable Entity (request validation on the server)
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Transport timeout
    #[error("Timeout: {0}")]
    Timeout(String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}

impl ApiError {
    /// Short message suitable for a notification body
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unprocessable(msg)
                if !msg.is_empty() =>
            {
                msg.clone()
            }
            ApiError::Timeout(_) => "The server took too long to respond".to_string(),
            ApiError::RequestError(_) => "Could not reach the server".to_string(),
            ApiError::ServerError(code, _) => format!("Server error ({})", code),
            other => other.to_string(),
        }
    }
}
