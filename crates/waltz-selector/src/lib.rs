//! Waltz Selector
//!
//! Turns "this entity, and maybe some of its relatives" into the canonical
//! [`SelectionOptions`] value that query services accept.
//!
//! # Overview
//!
//! - **Scope rules**: table-driven default scopes per entity kind
//!   ([`resolve_downward_scope`], [`resolve_upward_scope`])
//! - **SelectionOptions**: minimal, immutable query descriptor whose
//!   reference is always stripped to `{id, kind}`
//! - **Guards**: [`ensure_scope_is_exact`] for selectors over kinds with
//!   no hierarchy
//!
//! # Example
//!
//! ```rust
//! use waltz_selector::{build_selection_options, Scope};
//! use serde_json::json;
//!
//! let options = build_selection_options(
//!     &json!({ "id": 42, "kind": "APPLICATION", "name": "Trade Booking" }),
//!     None,
//!     None,
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(options.scope(), Scope::Exact);
//! assert_eq!(options.entity_reference().id(), 42);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod options;
pub mod scope;

// Re-exports
pub use config::SelectorConfig;
pub use error::{SelectorError, SelectorResult};
#[allow(deprecated)]
pub use options::mk_application_selection_options;
pub use options::{
    build_selection_options, ensure_scope_is_exact, Filters, SelectionKey, SelectionOptions,
    SelectionOptionsBuilder,
};
pub use scope::{resolve_downward_scope, resolve_upward_scope, Scope};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building selection options
    pub use crate::{
        build_selection_options, ensure_scope_is_exact, resolve_downward_scope,
        resolve_upward_scope, Filters, Scope, SelectionOptions, SelectorConfig, SelectorError,
    };
    pub use waltz_model::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
