//! EntityKind - open set of catalogue entity kinds
//!
//! Kinds travel as upper-case strings (`"APPLICATION"`, `"ORG_UNIT"`, ...).
//! The set is open: kinds this crate has no constant for are still valid
//! and compare by their textual name.

use crate::checks::EntityRefError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Kind of an addressable domain entity
///
/// # Example
/// ```
/// use waltz_model::EntityKind;
///
/// let kind: EntityKind = "ORG_UNIT".parse().unwrap();
/// assert_eq!(kind, EntityKind::ORG_UNIT);
///
/// let novel = EntityKind::new("ROADMAP");
/// assert_eq!(novel.as_str(), "ROADMAP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKind(Cow<'static, str>);

macro_rules! well_known_kinds {
    ($($(#[$doc:meta])* $name:ident),+ $(,)?) => {
        impl EntityKind {
            $(
                $(#[$doc])*
                pub const $name: Self = Self(Cow::Borrowed(stringify!($name)));
            )+

            /// Every kind this crate has a constant for
            pub const WELL_KNOWN: &'static [Self] = &[$(Self::$name),+];
        }
    };
}

well_known_kinds! {
    /// External party exchanging data with applications
    ACTOR,
    /// Application
    APPLICATION,
    /// Curated group of applications
    APP_GROUP,
    /// Project or programme of change
    CHANGE_INITIATIVE,
    /// Data classification
    DATA_TYPE,
    /// Hand-drawn flow diagram
    FLOW_DIAGRAM,
    /// Software licence
    LICENCE,
    /// Element of a logical data model
    LOGICAL_DATA_ELEMENT,
    /// Logical data flow between two endpoints
    LOGICAL_FLOW,
    /// Node of a taxonomy (capability, process, ...)
    MEASURABLE,
    /// Organisational unit
    ORG_UNIT,
    /// Person
    PERSON,
    /// Physical realisation of a logical flow
    PHYSICAL_FLOW,
    /// Specification of a physical flow's payload
    PHYSICAL_SPECIFICATION,
    /// Roadmap scenario
    SCENARIO,
    /// Server
    SERVER,
    /// Software package
    SOFTWARE,
    /// Version of a software package
    SOFTWARE_VERSION,
}

impl EntityKind {
    /// Create a kind from its name
    ///
    /// No validation is applied here; use [`FromStr`] at input boundaries.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Textual name of the kind
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this crate has a constant for the kind
    #[must_use]
    pub fn is_well_known(&self) -> bool {
        Self::WELL_KNOWN.contains(self)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityKind {
    type Err = EntityRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(EntityRefError::EmptyKind);
        }
        Ok(Self::WELL_KNOWN
            .iter()
            .find(|k| k.as_str() == s)
            .cloned()
            .unwrap_or_else(|| Self::new(s)))
    }
}

impl AsRef<str> for EntityKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for EntityKind {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_carry_their_names() {
        assert_eq!(EntityKind::APPLICATION.as_str(), "APPLICATION");
        assert_eq!(EntityKind::APP_GROUP.as_str(), "APP_GROUP");
        assert_eq!(EntityKind::SOFTWARE_VERSION.to_string(), "SOFTWARE_VERSION");
    }

    #[test]
    fn borrowed_and_owned_compare_equal() {
        assert_eq!(EntityKind::new("ORG_UNIT"), EntityKind::ORG_UNIT);
        assert!(EntityKind::new("MEASURABLE").is_well_known());
        assert!(!EntityKind::new("ROADMAP").is_well_known());
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(matches!("".parse::<EntityKind>(), Err(EntityRefError::EmptyKind)));
        assert!(matches!("   ".parse::<EntityKind>(), Err(EntityRefError::EmptyKind)));
    }

    #[test]
    fn parse_keeps_padding() {
        let kind: EntityKind = " SERVER ".parse().unwrap();
        assert_eq!(kind.as_str(), " SERVER ");
        assert!(!kind.is_well_known());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&EntityKind::LICENCE).unwrap();
        assert_eq!(json, "\"LICENCE\"");

        let back: EntityKind = serde_json::from_str("\"LICENCE\"").unwrap();
        assert_eq!(back, EntityKind::LICENCE);
    }
}
