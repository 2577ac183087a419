//! Gateway error types

use thiserror::Error;

/// Errors raised by table-store, auth and function calls
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level failure (DNS, TLS, connection reset, body decode)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend could not be reached
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    /// The backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A single-row read matched no rows
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authenticated")]
    Unauthorized,

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Classify a reqwest error the same way for every call
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if is_connect(&err) {
            GatewayError::Unavailable
        } else {
            GatewayError::Request(err)
        }
    }

    /// The request never got an answer from the backend
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::Request(_) | GatewayError::Unavailable | GatewayError::Timeout
        )
    }

    /// The backend refused the credentials, as opposed to failing
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            GatewayError::Unauthorized | GatewayError::Api { status: 403, .. }
        )
    }

    /// PostgREST error code, if the backend sent one
    pub fn code(&self) -> Option<&str> {
        match self {
            GatewayError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn is_connect(err: &reqwest::Error) -> bool {
    err.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_connect(_err: &reqwest::Error) -> bool {
    false
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::Api {
            status: 409,
            code: Some("23505".to_string()),
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.to_string(), "API error 409: duplicate key");
        assert_eq!(err.code(), Some("23505"));

        let err = GatewayError::NotFound("orders/42".to_string());
        assert_eq!(err.to_string(), "Not found: orders/42");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: GatewayError = json_err.into();
        assert!(matches!(err, GatewayError::Decode(_)));
    }
}
