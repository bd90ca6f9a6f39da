//! Error types for luxtronik-state

use thiserror::Error;

/// Errors raised while converting between raw registers and typed values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A raw value is outside the enumeration permitted for its register
    #[error("Value {value} is not permitted for register {address}")]
    ValueNotInDomain { address: i32, value: i32 },

    /// An index derived from the mapping or the payload is out of bounds
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: i64, len: usize },

    /// No writable value set is defined for the register
    #[error("No writable values defined for register {0}")]
    UnknownAddress(i32),

    /// The command payload lacks a field the write transform needs
    #[error("Command payload is missing '{0}'")]
    MissingPayload(&'static str),
}

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, TransformError>;
