//! SelectionOptions - canonical descriptor handed to query services
//!
//! Downstream brokers cache on structural equality of the options, so
//! the reference inside is always the bare `{id, kind}` pair, statuses
//! are an ordered set and filters an ordered map.

use crate::config::SelectorConfig;
use crate::error::{SelectorError, SelectorResult};
use crate::scope::{resolve_downward_scope, resolve_upward_scope, Scope};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use waltz_model::{AsEntityReference, EntityLifecycleStatus, EntityReference};

/// Opaque filter mapping passed through to query services
pub type Filters = BTreeMap<String, Value>;

/// Normalized selection descriptor
///
/// Built fresh for every query and never mutated afterwards.
///
/// # Example
/// ```
/// use waltz_model::{EntityKind, EntityReference};
/// use waltz_selector::{Scope, SelectionOptions};
///
/// let options = SelectionOptions::builder(EntityReference::new(EntityKind::ORG_UNIT, 7)).build();
/// assert_eq!(options.scope(), Scope::Children);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SelectionOptionsRepr")]
pub struct SelectionOptions {
    entity_reference: EntityReference,
    scope: Scope,
    entity_lifecycle_statuses: BTreeSet<EntityLifecycleStatus>,
    filters: Filters,
}

/// Wire form accepted on deserialization; scope and statuses may be absent
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionOptionsRepr {
    entity_reference: EntityReference,
    #[serde(default)]
    scope: Option<Scope>,
    #[serde(default)]
    entity_lifecycle_statuses: Option<BTreeSet<EntityLifecycleStatus>>,
    #[serde(default)]
    filters: Filters,
}

impl From<SelectionOptionsRepr> for SelectionOptions {
    fn from(repr: SelectionOptionsRepr) -> Self {
        let mut builder = SelectionOptions::builder(repr.entity_reference).filters(repr.filters);
        if let Some(scope) = repr.scope {
            builder = builder.scope(scope);
        }
        if let Some(statuses) = repr.entity_lifecycle_statuses {
            builder = builder.lifecycle_statuses(statuses);
        }
        builder.build()
    }
}

impl SelectionOptions {
    /// Start building options for `reference`
    #[inline]
    #[must_use]
    pub fn builder(reference: impl AsEntityReference) -> SelectionOptionsBuilder {
        SelectionOptionsBuilder::new(reference.entity_reference())
    }

    /// Options with every default applied
    #[inline]
    #[must_use]
    pub fn for_reference(reference: &impl AsEntityReference) -> Self {
        Self::builder(reference).build()
    }

    /// Stripped entity reference
    #[inline]
    #[must_use]
    pub fn entity_reference(&self) -> &EntityReference {
        &self.entity_reference
    }

    /// Query scope
    #[inline]
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Lifecycle statuses the query is restricted to
    #[inline]
    #[must_use]
    pub fn entity_lifecycle_statuses(&self) -> &BTreeSet<EntityLifecycleStatus> {
        &self.entity_lifecycle_statuses
    }

    /// Opaque filters
    #[inline]
    #[must_use]
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Copy of these options with the given scope
    #[must_use]
    pub fn with_scope(&self, scope: Scope) -> Self {
        Self {
            scope,
            ..self.clone()
        }
    }

    /// Copy of these options scoped upward from the reference's kind
    #[must_use]
    pub fn with_upward_scope(&self) -> Self {
        self.with_scope(resolve_upward_scope(self.entity_reference.kind()))
    }

    /// Structural cache key
    ///
    /// Equal for any two options that serialize identically.
    #[must_use]
    pub fn cache_key(&self) -> SelectionKey {
        let statuses: Vec<&str> = self
            .entity_lifecycle_statuses
            .iter()
            .map(|s| s.as_str())
            .collect();
        let filters: serde_json::Map<String, Value> = self
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        SelectionKey(format!(
            "{}|{}|{}|{}",
            self.entity_reference,
            self.scope,
            statuses.join(","),
            Value::Object(filters)
        ))
    }
}

/// Cache key derived from [`SelectionOptions::cache_key`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionKey(String);

impl SelectionKey {
    /// Key text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SelectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builder for [`SelectionOptions`]
///
/// Unset scope falls back to [`resolve_downward_scope`]; unset statuses
/// fall back to `{ACTIVE}` (or the configured default with [`build_with`]).
///
/// [`build_with`]: SelectionOptionsBuilder::build_with
#[derive(Debug, Clone)]
#[must_use]
pub struct SelectionOptionsBuilder {
    reference: EntityReference,
    scope: Option<Scope>,
    statuses: Option<BTreeSet<EntityLifecycleStatus>>,
    filters: Filters,
}

impl SelectionOptionsBuilder {
    fn new(reference: EntityReference) -> Self {
        Self {
            reference,
            scope: None,
            statuses: None,
            filters: Filters::new(),
        }
    }

    /// Explicit scope, overriding the kind's default
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Optional scope; `None` keeps the kind's default
    pub fn maybe_scope(mut self, scope: Option<Scope>) -> Self {
        self.scope = scope.or(self.scope);
        self
    }

    /// Restrict to these lifecycle statuses
    pub fn lifecycle_statuses(
        mut self,
        statuses: impl IntoIterator<Item = EntityLifecycleStatus>,
    ) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Replace all filters
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Add a single filter entry
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Build with built-in defaults
    #[must_use]
    pub fn build(self) -> SelectionOptions {
        self.finish(|| BTreeSet::from([EntityLifecycleStatus::Active]))
    }

    /// Build with defaults taken from `config`
    #[must_use]
    pub fn build_with(self, config: &SelectorConfig) -> SelectionOptions {
        self.finish(|| config.default_lifecycle_statuses.iter().copied().collect())
    }

    fn finish(
        self,
        default_statuses: impl FnOnce() -> BTreeSet<EntityLifecycleStatus>,
    ) -> SelectionOptions {
        let scope = self
            .scope
            .unwrap_or_else(|| resolve_downward_scope(self.reference.kind()));

        tracing::debug!(
            reference = %self.reference,
            %scope,
            explicit_scope = self.scope.is_some(),
            "built selection options"
        );

        SelectionOptions {
            entity_reference: self.reference,
            scope,
            entity_lifecycle_statuses: self.statuses.unwrap_or_else(default_statuses),
            filters: self.filters,
        }
    }
}

/// Build canonical selection options from a loosely-typed reference
///
/// # Arguments
/// - `entity_reference`: JSON object with at least `id` and `kind`
/// - `scope`: explicit scope; defaults to [`resolve_downward_scope`] of the kind
/// - `entity_lifecycle_statuses`: defaults to `["ACTIVE"]`
/// - `filters`: defaults to `{}`
///
/// # Errors
/// [`SelectorError::InvalidArgument`] if `entity_reference` is null or
/// lacks a usable `id`/`kind`.
pub fn build_selection_options(
    entity_reference: &Value,
    scope: Option<Scope>,
    entity_lifecycle_statuses: Option<&[EntityLifecycleStatus]>,
    filters: Option<Filters>,
) -> SelectorResult<SelectionOptions> {
    let reference = EntityReference::from_value(entity_reference)?;

    let mut builder = SelectionOptions::builder(reference)
        .maybe_scope(scope)
        .filters(filters.unwrap_or_default());
    if let Some(statuses) = entity_lifecycle_statuses {
        builder = builder.lifecycle_statuses(statuses.iter().copied());
    }

    Ok(builder.build())
}

/// Former name of [`build_selection_options`]
///
/// # Errors
/// Same as [`build_selection_options`].
#[deprecated(since = "0.1.0", note = "use build_selection_options instead")]
pub fn mk_application_selection_options(
    entity_reference: &Value,
    scope: Option<Scope>,
    entity_lifecycle_statuses: Option<&[EntityLifecycleStatus]>,
    filters: Option<Filters>,
) -> SelectorResult<SelectionOptions> {
    tracing::warn!(
        "mk_application_selection_options is deprecated, calling build_selection_options instead"
    );
    build_selection_options(entity_reference, scope, entity_lifecycle_statuses, filters)
}

/// Reject options whose scope is not [`Scope::Exact`]
///
/// Selectors over kinds with no hierarchy can only answer exact lookups.
///
/// # Errors
/// [`SelectorError::InvalidArgument`] naming the offending scope.
pub fn ensure_scope_is_exact(options: &SelectionOptions) -> SelectorResult<()> {
    if options.scope() == Scope::Exact {
        Ok(())
    } else {
        Err(SelectorError::invalid_argument(format!(
            "only EXACT scope is supported for {}, got {}",
            options.entity_reference().kind(),
            options.scope()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use waltz_model::{EntityKind, NamedEntityReference};

    #[test]
    fn application_defaults() {
        let options = build_selection_options(&json!({ "id": 42, "kind": "APPLICATION" }), None, None, None)
            .unwrap();

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "entityReference": { "id": 42, "kind": "APPLICATION" },
                "scope": "EXACT",
                "entityLifecycleStatuses": ["ACTIVE"],
                "filters": {}
            })
        );
    }

    #[test]
    fn org_unit_defaults_to_children() {
        let options =
            build_selection_options(&json!({ "id": 7, "kind": "ORG_UNIT" }), None, None, None).unwrap();
        assert_eq!(options.scope(), Scope::Children);
    }

    #[test]
    fn extra_fields_are_stripped() {
        let options = build_selection_options(
            &json!({ "id": 1, "kind": "APPLICATION", "extra": "junk" }),
            None,
            None,
            None,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(options.entity_reference()).unwrap(),
            json!({ "id": 1, "kind": "APPLICATION" })
        );
    }

    #[test]
    fn null_reference_is_invalid_argument() {
        let err = build_selection_options(&Value::Null, None, None, None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn explicit_scope_overrides_default() {
        let options = build_selection_options(
            &json!({ "id": 42, "kind": "APPLICATION" }),
            Some(Scope::Parents),
            None,
            None,
        )
        .unwrap();
        assert_eq!(options.scope(), Scope::Parents);
    }

    #[test]
    fn explicit_statuses_and_filters_pass_through() {
        let mut filters = Filters::new();
        filters.insert("omaFilter".into(), json!({ "kinds": ["SERVER"] }));

        let options = build_selection_options(
            &json!({ "id": 3, "kind": "MEASURABLE" }),
            None,
            Some(&[EntityLifecycleStatus::Pending, EntityLifecycleStatus::Active]),
            Some(filters.clone()),
        )
        .unwrap();

        assert_eq!(
            options.entity_lifecycle_statuses().iter().copied().collect::<Vec<_>>(),
            vec![EntityLifecycleStatus::Active, EntityLifecycleStatus::Pending]
        );
        assert_eq!(options.filters(), &filters);
    }

    #[test]
    fn empty_status_list_is_kept_empty() {
        let options = build_selection_options(
            &json!({ "id": 3, "kind": "APPLICATION" }),
            None,
            Some(&[]),
            None,
        )
        .unwrap();
        assert!(options.entity_lifecycle_statuses().is_empty());
    }

    #[test]
    #[allow(deprecated)]
    fn deprecated_alias_matches() {
        let reference = json!({ "id": 11, "kind": "ORG_UNIT", "name": "Ops" });
        assert_eq!(
            mk_application_selection_options(&reference, None, None, None).unwrap(),
            build_selection_options(&reference, None, None, None).unwrap()
        );
    }

    #[test]
    fn builder_accepts_named_references() {
        let named = NamedEntityReference::new(EntityKind::DATA_TYPE, 8, "Trade");
        let options = SelectionOptions::builder(&named).filter("region", "EMEA").build();

        assert_eq!(options.entity_reference(), &EntityReference::new(EntityKind::DATA_TYPE, 8));
        assert_eq!(options.scope(), Scope::Children);
        assert_eq!(options.filters().get("region"), Some(&json!("EMEA")));
    }

    #[test]
    fn build_with_config_uses_configured_statuses() {
        let config = SelectorConfig::default().with_default_lifecycle_statuses(vec![
            EntityLifecycleStatus::Active,
            EntityLifecycleStatus::Pending,
        ]);
        let options = SelectionOptions::builder(EntityReference::new(EntityKind::APPLICATION, 1))
            .build_with(&config);
        assert_eq!(options.entity_lifecycle_statuses().len(), 2);
    }

    #[test]
    fn upward_scope_follows_kind() {
        let org = SelectionOptions::for_reference(&EntityReference::new(EntityKind::ORG_UNIT, 1));
        assert_eq!(org.with_upward_scope().scope(), Scope::Parents);

        let app = SelectionOptions::for_reference(&EntityReference::new(EntityKind::APPLICATION, 1));
        assert_eq!(app.with_upward_scope().scope(), Scope::Exact);
    }

    #[test]
    fn ensure_exact_guard() {
        let exact = SelectionOptions::for_reference(&EntityReference::new(EntityKind::SERVER, 2));
        assert!(ensure_scope_is_exact(&exact).is_ok());

        let err = ensure_scope_is_exact(&exact.with_scope(Scope::Children)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("SERVER"));
    }

    #[test]
    fn deserialize_fills_missing_scope_and_statuses() {
        let options: SelectionOptions = serde_json::from_value(json!({
            "entityReference": { "id": 5, "kind": "ORG_UNIT", "name": "Finance" }
        }))
        .unwrap();

        assert_eq!(options, SelectionOptions::for_reference(&EntityReference::new(EntityKind::ORG_UNIT, 5)));
    }

    #[test]
    fn cache_key_ignores_decoration() {
        let plain = build_selection_options(&json!({ "id": 1, "kind": "APPLICATION" }), None, None, None)
            .unwrap();
        let decorated = build_selection_options(
            &json!({ "id": 1, "kind": "APPLICATION", "name": "Foo", "description": "bar" }),
            None,
            None,
            None,
        )
        .unwrap();

        assert_eq!(plain.cache_key(), decorated.cache_key());
        assert_eq!(plain.cache_key().as_str(), "APPLICATION/1|EXACT|ACTIVE|{}");
    }

    #[test]
    fn cache_key_distinguishes_scope() {
        let options = SelectionOptions::for_reference(&EntityReference::new(EntityKind::ORG_UNIT, 1));
        assert_ne!(options.cache_key(), options.with_scope(Scope::Exact).cache_key());
    }
}
