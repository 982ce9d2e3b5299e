//! Error types for selector queries

use waltz_model::EntityKind;
use waltz_selector::SelectorError;

/// Errors raised by query services
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Store cannot answer selectors rooted at this kind
    #[error("cannot create {store} selector from {requested} reference")]
    UnsupportedKind {
        /// Kind held by the store
        store: EntityKind,
        /// Kind of the selector's reference
        requested: EntityKind,
    },

    /// Selection options rejected
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    /// Backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl QueryError {
    /// Create unsupported kind error
    pub fn unsupported_kind(store: &EntityKind, requested: &EntityKind) -> Self {
        Self::UnsupportedKind {
            store: store.clone(),
            requested: requested.clone(),
        }
    }
}

/// Result type alias for query operations
pub type QueryResult<T> = Result<T, QueryError>;
