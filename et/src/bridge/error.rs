//! Bridge error types

use thiserror::Error;

/// Errors from the conversational backend or the emission service
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            BridgeError::Backend { status, .. } => is_retryable_status(*status),
            BridgeError::Network(_) => true,
            BridgeError::InvalidResponse(_) => false,
            BridgeError::Json(_) => false,
        }
    }
}

/// Check if an HTTP status code is transient
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(
            BridgeError::Backend {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_retryable()
        );

        assert!(
            !BridgeError::Backend {
                status: 400,
                message: "Message is required".to_string()
            }
            .is_retryable()
        );

        assert!(!BridgeError::InvalidResponse("bad payload".to_string()).is_retryable());
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(is_retryable_status(status), "{} should be retryable", status);
        }
        for status in [200, 400, 401, 404] {
            assert!(!is_retryable_status(status), "{} should not be retryable", status);
        }
    }
}
