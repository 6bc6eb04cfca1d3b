//! Error types for userlist-sync data types.

use thiserror::Error;

/// Errors that can occur encoding or decoding persisted snapshot parts.
#[derive(Debug, Error)]
pub enum TypesError {
    /// JSON serialization of the record list failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization of the record list failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Stored timestamp is not valid ISO-8601
    #[error("invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        /// The raw stored value.
        value: String,
        /// Underlying parse error.
        #[source]
        source: chrono::ParseError,
    },
}
