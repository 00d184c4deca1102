/// Crate-level error type for the segno note alignment library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two feature vectors (or parallel arrays) had different lengths.
    #[error("shape mismatch: expected length {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// A sequence was empty where a non-empty one was required.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Interpolator construction received an unusable domain.
    #[error("invalid interpolation domain: {reason}")]
    InvalidDomain { reason: &'static str },

    /// A configuration value is outside its valid range.
    #[error("malformed config `{name}`: got {value}, {reason}")]
    MalformedConfig {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Convenience Result type for segno operations.
pub type Result<T> = std::result::Result<T, Error>;
