use thiserror::Error;
use wire_client::WireError;

/// High-level API errors for controller operations
///
/// Abstracts away the framing details of the underlying register client and
/// separates transport failures (worth one retry) from protocol failures
/// (never retried).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connect, send or receive failure
    ///
    /// The only recoverable error: the client retries it once on a fresh
    /// connection before surfacing it.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The controller echoed a different command code than the one sent
    #[error("Protocol mismatch: sent command {expected}, controller echoed {received}")]
    ProtocolMismatch { expected: i32, received: i32 },

    /// The response frame was structurally valid but unusable
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}

impl ApiError {
    /// Whether a fresh connection might make the operation succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Connection(_))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<WireError> for ApiError {
    fn from(error: WireError) -> Self {
        match error {
            WireError::Connection(msg) => ApiError::Connection(msg),
            WireError::ProtocolMismatch { expected, received } => {
                ApiError::ProtocolMismatch { expected, received }
            }
            WireError::InvalidLength(length) => {
                ApiError::InvalidFrame(format!("register count {} out of range", length))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_error_conversion() {
        let api_error: ApiError = WireError::Connection("reset".to_string()).into();
        assert!(matches!(api_error, ApiError::Connection(_)));

        let api_error: ApiError = WireError::ProtocolMismatch { expected: 3004, received: 3003 }.into();
        assert!(matches!(api_error, ApiError::ProtocolMismatch { expected: 3004, received: 3003 }));

        let api_error: ApiError = WireError::InvalidLength(-1).into();
        assert!(matches!(api_error, ApiError::InvalidFrame(_)));
    }

    #[test]
    fn test_only_connection_errors_are_retryable() {
        assert!(ApiError::Connection("timeout".to_string()).is_retryable());
        assert!(!ApiError::ProtocolMismatch { expected: 1, received: 2 }.is_retryable());
        assert!(!ApiError::InvalidFrame("short".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::ProtocolMismatch { expected: 3004, received: 3003 };
        assert_eq!(
            format!("{}", err),
            "Protocol mismatch: sent command 3004, controller echoed 3003"
        );
    }
}
