//! Error types for the engine.
//!
//! Most failures never leave the engine: a missing directory or a malformed
//! document is logged and turned into an empty load for that source. These
//! variants carry the detail for that log line. Only
//! [`EngineError::InvalidSource`] is returned to callers, from
//! [`SourceDescriptor::parse`](crate::types::SourceDescriptor::parse).

/// Errors produced while reading skill documents or describing sources.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// I/O error while reading a document.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Document exceeds the configured maximum size.
    #[error("Document too large: {path} ({size} bytes > {max} bytes)")]
    TooLarge {
        /// Path to the oversized file.
        path: String,
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// A JSON index could not be parsed.
    #[error("Malformed JSON index {path}: {source}")]
    Json {
        /// Path to the index file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A source specification is structurally invalid.
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
