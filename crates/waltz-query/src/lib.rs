//! Waltz Query
//!
//! The query-service side of selection options: stores answer
//! `find_for_selector` / `find_by_id_selector`, and a broker cache
//! shares results between structurally identical requests.
//!
//! # Architecture
//!
//! ```text
//! controller → SelectionOptions → CachedSelectorQuery → SelectorQuery (store)
//!                                       ↑_________↓
//!                                 moka cache keyed on SelectionKey
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use waltz_query::{CachedSelectorQuery, InMemoryEntityStore, SelectorQuery};
//!
//! # async fn example(store: InMemoryEntityStore) -> Result<(), Box<dyn std::error::Error>> {
//! let cached = CachedSelectorQuery::new(store, &SelectorConfig::default());
//! let options = SelectionOptions::for_reference(&EntityReference::new(EntityKind::ORG_UNIT, 1));
//! let org_units = cached.find_for_selector(&options).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod entity;
pub mod error;
pub mod memory;
pub mod service;

// Re-exports for convenience
pub use cache::{CacheStats, CachedSelectorQuery};
pub use entity::CatalogEntity;
pub use error::{QueryError, QueryResult};
pub use memory::{Hierarchy, InMemoryEntityStore};
pub use service::SelectorQuery;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for querying by selector
    pub use crate::cache::{CacheStats, CachedSelectorQuery};
    pub use crate::entity::CatalogEntity;
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::memory::InMemoryEntityStore;
    pub use crate::service::SelectorQuery;
    pub use waltz_selector::prelude::*;
}
