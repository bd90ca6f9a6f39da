//! Error types for the register client

use thiserror::Error;

/// Errors that can occur during a register exchange
#[derive(Debug, Error)]
pub enum WireError {
    /// Connect, send or receive failure (including a peer closing mid-frame)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The controller echoed a different command code than the one sent
    #[error("Protocol mismatch: sent command {expected}, controller echoed {received}")]
    ProtocolMismatch { expected: i32, received: i32 },

    /// The response announced a register count that cannot be a real frame
    #[error("Invalid register count in response: {0}")]
    InvalidLength(i32),
}

impl From<std::io::Error> for WireError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                WireError::Connection("peer closed before a complete frame was received".to_string())
            }
            _ => WireError::Connection(error.to_string()),
        }
    }
}
