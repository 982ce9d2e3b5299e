//! Query-service seam
//!
//! Anything that can answer "which entities does this selector cover?".

use crate::error::QueryResult;
use async_trait::async_trait;
use waltz_selector::SelectionOptions;

/// Service resolving selection options to entities
///
/// Result ordering is whatever the implementation defines.
#[async_trait]
pub trait SelectorQuery: Send + Sync {
    /// Entity type returned by the service
    type Entity: Clone + Send + Sync + 'static;

    /// Entities covered by `options`
    async fn find_for_selector(&self, options: &SelectionOptions)
        -> QueryResult<Vec<Self::Entity>>;

    /// Ids of the entities covered by `options`
    async fn find_by_id_selector(&self, options: &SelectionOptions) -> QueryResult<Vec<i64>>;
}
