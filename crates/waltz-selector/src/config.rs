//! Selector configuration
//!
//! Loaded from TOML; every field is optional and falls back to
//! [`SelectorConfig::default`].
//!
//! ```toml
//! default_lifecycle_statuses = ["ACTIVE", "PENDING"]
//! cache_max_capacity = 5000
//! cache_ttl_secs = 300
//! ```

use crate::error::{SelectorError, SelectorResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use waltz_model::EntityLifecycleStatus;

/// Defaults applied when building and caching selection options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Statuses used when the caller supplies none
    pub default_lifecycle_statuses: Vec<EntityLifecycleStatus>,
    /// Maximum number of cached query results
    pub cache_max_capacity: u64,
    /// Time-to-live of cached results, `None` for no expiry
    pub cache_ttl_secs: Option<u64>,
}

impl SelectorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default lifecycle statuses
    #[inline]
    #[must_use]
    pub fn with_default_lifecycle_statuses(mut self, statuses: Vec<EntityLifecycleStatus>) -> Self {
        self.default_lifecycle_statuses = statuses;
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_max_capacity(mut self, capacity: u64) -> Self {
        self.cache_max_capacity = capacity;
        self
    }

    /// With cache time-to-live
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = Some(ttl.as_secs());
        self
    }

    /// Cache time-to-live
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// [`SelectorError::Config`] on malformed TOML or a zero cache capacity.
    pub fn from_toml_str(text: &str) -> SelectorResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SelectorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// [`SelectorError::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> SelectorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SelectorError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded selector configuration");
        Ok(config)
    }

    fn validate(&self) -> SelectorResult<()> {
        if self.cache_max_capacity == 0 {
            return Err(SelectorError::Config(
                "cache_max_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            default_lifecycle_statuses: vec![EntityLifecycleStatus::Active],
            cache_max_capacity: 10_000,
            cache_ttl_secs: None,
        }
    }
}
