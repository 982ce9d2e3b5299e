//! Query scope and the default scope rules per entity kind
//!
//! Kinds without a meaningful containment hierarchy are looked up
//! exactly; everything else expands downward by default. The upward
//! table lists the kinds whose ancestors are worth walking.

use crate::error::SelectorError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use waltz_model::EntityKind;

/// How far a query expands from the referenced entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Only the referenced entity
    Exact,
    /// Referenced entity and its descendants
    Children,
    /// Referenced entity and its ancestors
    Parents,
}

impl Scope {
    /// All scopes, in declaration order
    pub const ALL: [Self; 3] = [Self::Exact, Self::Children, Self::Parents];

    /// Wire name of the scope
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "EXACT",
            Self::Children => "CHILDREN",
            Self::Parents => "PARENTS",
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectorError::invalid_argument(format!("unknown scope: '{s}'")))
    }
}

/// Kinds selected exactly when no scope is given
pub const DOWNWARD_EXACT_KINDS: &[EntityKind] = &[
    EntityKind::ACTOR,
    EntityKind::APPLICATION,
    EntityKind::APP_GROUP,
    EntityKind::CHANGE_INITIATIVE,
    EntityKind::FLOW_DIAGRAM,
    EntityKind::LICENCE,
    EntityKind::LOGICAL_DATA_ELEMENT,
    EntityKind::LOGICAL_FLOW,
    EntityKind::PHYSICAL_FLOW,
    EntityKind::PHYSICAL_SPECIFICATION,
    EntityKind::SCENARIO,
    EntityKind::SERVER,
    EntityKind::SOFTWARE,
    EntityKind::SOFTWARE_VERSION,
];

/// Kinds whose upward scope walks ancestors
pub const UPWARD_PARENT_KINDS: &[EntityKind] = &[
    EntityKind::ORG_UNIT,
    EntityKind::MEASURABLE,
    EntityKind::DATA_TYPE,
    EntityKind::CHANGE_INITIATIVE,
];

fn table_contains(table: &[EntityKind], kind: &str) -> bool {
    table.iter().any(|k| k.as_str() == kind)
}

/// Default scope when looking down from an entity of `kind`
///
/// Unknown kinds resolve to [`Scope::Children`].
#[must_use]
pub fn resolve_downward_scope(kind: impl AsRef<str>) -> Scope {
    if table_contains(DOWNWARD_EXACT_KINDS, kind.as_ref()) {
        Scope::Exact
    } else {
        Scope::Children
    }
}

/// Default scope when looking up from an entity of `kind`
///
/// Unknown kinds resolve to [`Scope::Exact`].
#[must_use]
pub fn resolve_upward_scope(kind: impl AsRef<str>) -> Scope {
    if table_contains(UPWARD_PARENT_KINDS, kind.as_ref()) {
        Scope::Parents
    } else {
        Scope::Exact
    }
}
