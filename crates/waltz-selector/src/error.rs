//! Error types for selection-option resolution

use waltz_model::EntityRefError;

/// Errors raised while building or checking selection options
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// Caller supplied an argument the resolver cannot work with
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong
        message: String,
        /// Underlying reference problem, if any
        #[source]
        source: Option<EntityRefError>,
    },

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl SelectorError {
    /// Create invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            source: None,
        }
    }

    /// True for [`SelectorError::InvalidArgument`]
    #[inline]
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

impl From<EntityRefError> for SelectorError {
    fn from(err: EntityRefError) -> Self {
        Self::InvalidArgument {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias for selector operations
pub type SelectorResult<T> = Result<T, SelectorError>;
