//! Testing utilities for the Waltz selection workspace
//!
//! Shared fixtures: a small organisational-unit tree and a flat
//! application inventory.

#![allow(missing_docs)]

use serde_json::json;
use waltz_model::{EntityKind, EntityLifecycleStatus, EntityReference};
use waltz_query::{CatalogEntity, InMemoryEntityStore};

pub const GROUP: i64 = 1;
pub const FINANCE: i64 = 2;
pub const OPERATIONS: i64 = 3;
pub const PAYMENTS: i64 = 4;
pub const TREASURY: i64 = 5;
pub const RETIRED_DESK: i64 = 6;

pub fn org_unit_ref(id: i64) -> EntityReference {
    EntityReference::new(EntityKind::ORG_UNIT, id)
}

pub fn app_ref(id: i64) -> EntityReference {
    EntityReference::new(EntityKind::APPLICATION, id)
}

/// ```text
/// Group (1)
/// ├── Finance (2)
/// │   ├── Payments (4)        region=EMEA
/// │   └── Treasury (5)        PENDING, region=APAC
/// └── Operations (3)
///     └── Retired desk (6)    REMOVED
/// ```
pub fn org_unit_entities() -> Vec<CatalogEntity> {
    vec![
        CatalogEntity::new(EntityKind::ORG_UNIT, GROUP, "Group"),
        CatalogEntity::new(EntityKind::ORG_UNIT, FINANCE, "Finance").with_parent(GROUP),
        CatalogEntity::new(EntityKind::ORG_UNIT, OPERATIONS, "Operations").with_parent(GROUP),
        CatalogEntity::new(EntityKind::ORG_UNIT, PAYMENTS, "Payments")
            .with_parent(FINANCE)
            .with_attribute("region", json!("EMEA")),
        CatalogEntity::new(EntityKind::ORG_UNIT, TREASURY, "Treasury")
            .with_parent(FINANCE)
            .with_lifecycle_status(EntityLifecycleStatus::Pending)
            .with_attribute("region", json!("APAC")),
        CatalogEntity::new(EntityKind::ORG_UNIT, RETIRED_DESK, "Retired desk")
            .with_parent(OPERATIONS)
            .with_lifecycle_status(EntityLifecycleStatus::Removed),
    ]
}

pub fn org_unit_store() -> InMemoryEntityStore {
    let store = InMemoryEntityStore::new(EntityKind::ORG_UNIT);
    store.extend(org_unit_entities()).unwrap();
    store
}

pub fn application_store() -> InMemoryEntityStore {
    let store = InMemoryEntityStore::new(EntityKind::APPLICATION);
    store
        .extend([
            CatalogEntity::new(EntityKind::APPLICATION, 10, "Trade Booking")
                .with_attribute("region", json!("EMEA")),
            CatalogEntity::new(EntityKind::APPLICATION, 11, "Ledger")
                .with_attribute("region", json!("APAC")),
            CatalogEntity::new(EntityKind::APPLICATION, 12, "Old Ledger")
                .with_lifecycle_status(EntityLifecycleStatus::Removed),
        ])
        .unwrap();
    store
}
