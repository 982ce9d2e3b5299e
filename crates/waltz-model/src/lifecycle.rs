//! Entity lifecycle statuses

use crate::checks::EntityRefError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Lifecycle status of a catalogue entity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLifecycleStatus {
    /// In use
    #[default]
    Active,
    /// Planned, not yet in use
    Pending,
    /// Retired or deleted
    Removed,
}

impl EntityLifecycleStatus {
    /// All statuses, in declaration order
    pub const ALL: [Self; 3] = [Self::Active, Self::Pending, Self::Removed];

    /// Wire name of the status
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Pending => "PENDING",
            Self::Removed => "REMOVED",
        }
    }
}

impl Display for EntityLifecycleStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityLifecycleStatus {
    type Err = EntityRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EntityRefError::UnknownLifecycleStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(EntityLifecycleStatus::default(), EntityLifecycleStatus::Active);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("removed".parse(), Ok(EntityLifecycleStatus::Removed));
        assert_eq!("PENDING".parse(), Ok(EntityLifecycleStatus::Pending));
        assert!("RETIRED".parse::<EntityLifecycleStatus>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&EntityLifecycleStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
    }
}
