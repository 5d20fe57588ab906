use thiserror::Error;

/// Top-level error type for the Sommelier system.
///
/// Subsystem crates define their own error types and convert into this one
/// (or wrap it) so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SommelierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid taste profile: {0}")]
    Validation(#[from] ValidationError),
}

/// Reasons a taste-profile candidate is rejected at the capture boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must be between 1 and 5, got {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("price bound must be non-negative, got {value}")]
    NegativePrice { value: i64 },

    #[error("price range lower bound {min} exceeds upper bound {max}")]
    InvertedPriceRange { min: i64, max: i64 },
}

impl From<toml::de::Error> for SommelierError {
    fn from(err: toml::de::Error) -> Self {
        SommelierError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SommelierError {
    fn from(err: toml::ser::Error) -> Self {
        SommelierError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SommelierError {
    fn from(err: serde_json::Error) -> Self {
        SommelierError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Sommelier operations.
pub type Result<T> = std::result::Result<T, SommelierError>;
