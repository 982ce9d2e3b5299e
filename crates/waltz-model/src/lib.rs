//! Waltz Model
//!
//! Addressable domain entities of the Waltz catalogue.
//!
//! # Overview
//!
//! - **EntityKind**: open set of entity kinds with constants for the well-known ones
//! - **EntityReference**: minimal `{id, kind}` pair identifying an entity
//! - **NamedEntityReference**: reference enriched with display data, as returned by queries
//! - **EntityLifecycleStatus**: `ACTIVE` / `PENDING` / `REMOVED`
//!
//! # Example
//!
//! ```rust
//! use waltz_model::{EntityKind, EntityReference};
//! use serde_json::json;
//!
//! let loose = json!({ "id": 42, "kind": "APPLICATION", "name": "Trade Booking" });
//! let reference = EntityReference::from_value(&loose).unwrap();
//!
//! assert_eq!(reference, EntityReference::new(EntityKind::APPLICATION, 42));
//! ```

#![warn(missing_docs)]

pub mod checks;
pub mod kind;
pub mod lifecycle;
pub mod reference;

// Re-exports
pub use checks::{check_is_entity_ref, EntityRefError};
pub use kind::EntityKind;
pub use lifecycle::EntityLifecycleStatus;
pub use reference::{AsEntityReference, EntityReference, NamedEntityReference};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with entity references
    pub use crate::{
        AsEntityReference, EntityKind, EntityLifecycleStatus, EntityRefError, EntityReference,
        NamedEntityReference,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
