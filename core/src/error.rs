//! Error types for the state codec

/// Errors produced while encoding or decoding generator state.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Malformed textual or binary document
    #[error("parse error at byte {offset}: {reason}")]
    Parse { offset: u64, reason: String },

    /// A required field is absent from the structured value
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A field (or the root) holds the wrong kind of value
    #[error("type mismatch for `{field}`: expected {expected}, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Not a valid size-prefixed LZ4 frame
    #[error("corrupt compressed stream: {0}")]
    Corruption(String),

    /// The value cannot be represented in the target format
    #[error("cannot encode value: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn parse(offset: u64, reason: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, CodecError>;
