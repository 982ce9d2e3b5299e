//! CatalogEntity - record held by the in-memory store

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use waltz_model::{
    AsEntityReference, EntityKind, EntityLifecycleStatus, EntityReference, NamedEntityReference,
};

/// Catalogue entity with its place in a containment hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntity {
    /// Entity id
    pub id: i64,
    /// Entity kind
    pub kind: EntityKind,
    /// Display name
    pub name: String,
    /// Containing entity, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Lifecycle status
    #[serde(default)]
    pub entity_lifecycle_status: EntityLifecycleStatus,
    /// Attributes matched against selector filters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl CatalogEntity {
    /// Create an active root entity
    #[must_use]
    pub fn new(kind: impl Into<EntityKind>, id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            parent_id: None,
            entity_lifecycle_status: EntityLifecycleStatus::Active,
            attributes: BTreeMap::new(),
        }
    }

    /// With containing entity
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// With lifecycle status
    #[inline]
    #[must_use]
    pub fn with_lifecycle_status(mut self, status: EntityLifecycleStatus) -> Self {
        self.entity_lifecycle_status = status;
        self
    }

    /// With attribute
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// True if every filter entry equals the attribute of the same name
    #[must_use]
    pub fn matches_filters(&self, filters: &BTreeMap<String, Value>) -> bool {
        filters
            .iter()
            .all(|(key, expected)| self.attributes.get(key) == Some(expected))
    }

    /// Decorated reference for display
    #[must_use]
    pub fn named_reference(&self) -> NamedEntityReference {
        NamedEntityReference::new(self.kind.clone(), self.id, self.name.clone())
            .with_lifecycle_status(self.entity_lifecycle_status)
    }
}

impl AsEntityReference for CatalogEntity {
    fn entity_reference(&self) -> EntityReference {
        EntityReference::new(self.kind.clone(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_match_on_equality() {
        let entity = CatalogEntity::new(EntityKind::APPLICATION, 1, "Ledger")
            .with_attribute("region", "EMEA")
            .with_attribute("tier", 1);

        let mut filters = BTreeMap::new();
        assert!(entity.matches_filters(&filters));

        filters.insert("region".to_string(), json!("EMEA"));
        assert!(entity.matches_filters(&filters));

        filters.insert("tier".to_string(), json!(2));
        assert!(!entity.matches_filters(&filters));
    }

    #[test]
    fn missing_attribute_never_matches() {
        let entity = CatalogEntity::new(EntityKind::APPLICATION, 1, "Ledger");
        let filters = BTreeMap::from([("region".to_string(), json!("EMEA"))]);
        assert!(!entity.matches_filters(&filters));
    }

    #[test]
    fn projects_to_reference() {
        let entity = CatalogEntity::new(EntityKind::ORG_UNIT, 4, "Payments").with_parent(2);
        assert_eq!(entity.entity_reference(), EntityReference::new(EntityKind::ORG_UNIT, 4));
        assert_eq!(entity.named_reference().name.as_deref(), Some("Payments"));
    }
}
