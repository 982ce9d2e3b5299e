//! EntityReference - minimal `{id, kind}` identity of a catalogue entity
//!
//! Queries return references decorated with names, descriptions and
//! lifecycle data ([`NamedEntityReference`]). Anything that keys a cache
//! or a query should use the bare [`EntityReference`] so that two
//! decorations of the same entity compare equal.

use crate::checks::{check_is_entity_ref, EntityRefError};
use crate::kind::EntityKind;
use crate::lifecycle::EntityLifecycleStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Minimal reference to an addressable domain entity
///
/// Serialises as `{"id": .., "kind": ..}` and nothing else. Deserialising
/// goes through [`EntityReference::from_value`], so a malformed reference
/// is rejected and extra fields are dropped.
///
/// # Example
/// ```
/// use waltz_model::{EntityKind, EntityReference};
///
/// let app = EntityReference::new(EntityKind::APPLICATION, 42);
/// assert_eq!(app.to_string(), "APPLICATION/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct EntityReference {
    id: i64,
    kind: EntityKind,
}

impl EntityReference {
    /// Create new reference
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<EntityKind>, id: i64) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }

    /// Build a reference from loosely-typed JSON
    ///
    /// Only `id` and `kind` are read; every other field is dropped.
    ///
    /// # Errors
    /// [`EntityRefError`] if `value` is not a well-formed reference.
    pub fn from_value(value: &Value) -> Result<Self, EntityRefError> {
        let (kind, id) = check_is_entity_ref(value)?;
        let kind = kind.parse::<EntityKind>()?;
        Ok(Self { id, kind })
    }

    /// Entity id
    #[inline]
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Entity kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Same entity kind as `other`
    #[inline]
    #[must_use]
    pub fn is_same_kind(&self, other: &EntityReference) -> bool {
        self.kind == other.kind
    }
}

impl Display for EntityReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

impl TryFrom<&Value> for EntityReference {
    type Error = EntityRefError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl TryFrom<Value> for EntityReference {
    type Error = EntityRefError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Reference decorated with display and lifecycle data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntityReference {
    /// Entity id
    pub id: i64,
    /// Entity kind
    pub kind: EntityKind,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle status
    #[serde(default)]
    pub entity_lifecycle_status: EntityLifecycleStatus,
}

impl NamedEntityReference {
    /// Create an active, named reference
    #[must_use]
    pub fn new(kind: impl Into<EntityKind>, id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: Some(name.into()),
            description: None,
            entity_lifecycle_status: EntityLifecycleStatus::Active,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With lifecycle status
    #[inline]
    #[must_use]
    pub fn with_lifecycle_status(mut self, status: EntityLifecycleStatus) -> Self {
        self.entity_lifecycle_status = status;
        self
    }
}

/// Anything that identifies a single entity
///
/// Implementors project themselves to the minimal reference; decoration
/// never survives the projection.
pub trait AsEntityReference {
    /// Minimal reference for this value
    fn entity_reference(&self) -> EntityReference;
}

impl AsEntityReference for EntityReference {
    fn entity_reference(&self) -> EntityReference {
        self.clone()
    }
}

impl AsEntityReference for NamedEntityReference {
    fn entity_reference(&self) -> EntityReference {
        EntityReference::new(self.kind.clone(), self.id)
    }
}

impl<T: AsEntityReference + ?Sized> AsEntityReference for &T {
    fn entity_reference(&self) -> EntityReference {
        (**self).entity_reference()
    }
}
