//! In-memory store answering selectors over one entity kind
//!
//! Scope expansion walks the `parent_id` links between records:
//! `CHILDREN` collects every descendant, `PARENTS` every ancestor.
//! Both walks tolerate cycles in the data.

use crate::entity::CatalogEntity;
use crate::error::{QueryError, QueryResult};
use crate::service::SelectorQuery;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, VecDeque};
use waltz_model::EntityKind;
use waltz_selector::{
    ensure_scope_is_exact, resolve_downward_scope, resolve_upward_scope, Scope, SelectionOptions,
};

/// Shape of the store's containment hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hierarchy {
    /// No hierarchy: only exact selectors are accepted
    Flat,
    /// Records form a tree through `parent_id`
    Tree,
}

impl Hierarchy {
    /// Natural hierarchy for `kind`
    ///
    /// Kinds that neither expand downward nor upward by default are flat.
    #[must_use]
    pub fn for_kind(kind: &EntityKind) -> Self {
        if resolve_downward_scope(kind) == Scope::Exact && resolve_upward_scope(kind) == Scope::Exact
        {
            Self::Flat
        } else {
            Self::Tree
        }
    }
}

/// Thread-safe in-memory [`SelectorQuery`] implementation
#[derive(Debug)]
pub struct InMemoryEntityStore {
    kind: EntityKind,
    hierarchy: Hierarchy,
    entities: RwLock<HashMap<i64, CatalogEntity>>,
}

impl InMemoryEntityStore {
    /// Create empty store with the kind's natural hierarchy
    #[must_use]
    pub fn new(kind: impl Into<EntityKind>) -> Self {
        let kind = kind.into();
        let hierarchy = Hierarchy::for_kind(&kind);
        Self::with_hierarchy(kind, hierarchy)
    }

    /// Create empty store with an explicit hierarchy
    #[must_use]
    pub fn with_hierarchy(kind: impl Into<EntityKind>, hierarchy: Hierarchy) -> Self {
        Self {
            kind: kind.into(),
            hierarchy,
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Kind held by this store
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Hierarchy of this store
    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> Hierarchy {
        self.hierarchy
    }

    /// Insert or replace a record
    ///
    /// # Errors
    /// [`QueryError::UnsupportedKind`] if the record's kind differs from the store's.
    pub fn insert(&self, entity: CatalogEntity) -> QueryResult<()> {
        if entity.kind != self.kind {
            return Err(QueryError::unsupported_kind(&self.kind, &entity.kind));
        }
        self.entities.write().insert(entity.id, entity);
        Ok(())
    }

    /// Insert many records, stopping at the first rejected one
    ///
    /// # Errors
    /// See [`InMemoryEntityStore::insert`].
    pub fn extend(&self, entities: impl IntoIterator<Item = CatalogEntity>) -> QueryResult<()> {
        entities.into_iter().try_for_each(|entity| self.insert(entity))
    }

    /// Remove a record
    pub fn remove(&self, id: i64) -> Option<CatalogEntity> {
        self.entities.write().remove(&id)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    /// True if the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Ids reached from the selector's reference by its scope
    ///
    /// Lifecycle and attribute filters are not applied here.
    ///
    /// # Errors
    /// - [`QueryError::UnsupportedKind`] if the reference is of another kind
    /// - [`QueryError::Selector`] for non-exact scopes on a flat store
    pub fn expand_scope(&self, options: &SelectionOptions) -> QueryResult<BTreeSet<i64>> {
        let reference = options.entity_reference();
        if reference.kind() != &self.kind {
            return Err(QueryError::unsupported_kind(&self.kind, reference.kind()));
        }
        if self.hierarchy == Hierarchy::Flat {
            ensure_scope_is_exact(options)?;
        }

        let entities = self.entities.read();
        let root = reference.id();
        if !entities.contains_key(&root) {
            tracing::debug!(%reference, "selector root not found");
            return Ok(BTreeSet::new());
        }

        let ids = match options.scope() {
            Scope::Exact => BTreeSet::from([root]),
            Scope::Children => descendants_of(&entities, root),
            Scope::Parents => ancestors_of(&entities, root),
        };

        tracing::debug!(%reference, scope = %options.scope(), count = ids.len(), "expanded selector");
        Ok(ids)
    }

    fn select(&self, options: &SelectionOptions) -> QueryResult<Vec<CatalogEntity>> {
        let ids = self.expand_scope(options)?;
        let entities = self.entities.read();

        Ok(ids
            .iter()
            .filter_map(|id| entities.get(id))
            .filter(|e| {
                options
                    .entity_lifecycle_statuses()
                    .contains(&e.entity_lifecycle_status)
            })
            .filter(|e| e.matches_filters(options.filters()))
            .cloned()
            .collect())
    }
}

fn descendants_of(entities: &HashMap<i64, CatalogEntity>, root: i64) -> BTreeSet<i64> {
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for entity in entities.values() {
        if let Some(parent) = entity.parent_id {
            children.entry(parent).or_default().push(entity.id);
        }
    }

    let mut seen = BTreeSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for &child in children.get(&current).into_iter().flatten() {
            if seen.insert(child) {
                queue.push_back(child);
            }
        }
    }
    seen
}

fn ancestors_of(entities: &HashMap<i64, CatalogEntity>, root: i64) -> BTreeSet<i64> {
    let mut seen = BTreeSet::from([root]);
    let mut current = entities.get(&root).and_then(|e| e.parent_id);
    while let Some(id) = current {
        if !entities.contains_key(&id) || !seen.insert(id) {
            break;
        }
        current = entities.get(&id).and_then(|e| e.parent_id);
    }
    seen
}

#[async_trait]
impl SelectorQuery for InMemoryEntityStore {
    type Entity = CatalogEntity;

    async fn find_for_selector(&self, options: &SelectionOptions) -> QueryResult<Vec<CatalogEntity>> {
        self.select(options)
    }

    async fn find_by_id_selector(&self, options: &SelectionOptions) -> QueryResult<Vec<i64>> {
        Ok(self.select(options)?.into_iter().map(|e| e.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waltz_model::{EntityLifecycleStatus, EntityReference};

    fn org_units() -> InMemoryEntityStore {
        let store = InMemoryEntityStore::new(EntityKind::ORG_UNIT);
        store
            .extend([
                CatalogEntity::new(EntityKind::ORG_UNIT, 1, "Group"),
                CatalogEntity::new(EntityKind::ORG_UNIT, 2, "Finance").with_parent(1),
                CatalogEntity::new(EntityKind::ORG_UNIT, 3, "Operations").with_parent(1),
                CatalogEntity::new(EntityKind::ORG_UNIT, 4, "Payments").with_parent(2),
            ])
            .unwrap();
        store
    }

    fn options(id: i64, scope: Scope) -> SelectionOptions {
        SelectionOptions::builder(EntityReference::new(EntityKind::ORG_UNIT, id))
            .scope(scope)
            .lifecycle_statuses(EntityLifecycleStatus::ALL)
            .build()
    }

    #[test]
    fn natural_hierarchies() {
        assert_eq!(Hierarchy::for_kind(&EntityKind::ORG_UNIT), Hierarchy::Tree);
        assert_eq!(Hierarchy::for_kind(&EntityKind::CHANGE_INITIATIVE), Hierarchy::Tree);
        assert_eq!(Hierarchy::for_kind(&EntityKind::APPLICATION), Hierarchy::Flat);
        assert_eq!(Hierarchy::for_kind(&EntityKind::new("ROADMAP")), Hierarchy::Tree);
    }

    #[test]
    fn exact_children_parents() {
        let store = org_units();
        assert_eq!(store.expand_scope(&options(2, Scope::Exact)).unwrap(), BTreeSet::from([2]));
        assert_eq!(
            store.expand_scope(&options(1, Scope::Children)).unwrap(),
            BTreeSet::from([1, 2, 3, 4])
        );
        assert_eq!(
            store.expand_scope(&options(2, Scope::Children)).unwrap(),
            BTreeSet::from([2, 4])
        );
        assert_eq!(
            store.expand_scope(&options(4, Scope::Parents)).unwrap(),
            BTreeSet::from([1, 2, 4])
        );
    }

    #[test]
    fn cycles_terminate() {
        let store = InMemoryEntityStore::new(EntityKind::ORG_UNIT);
        store
            .extend([
                CatalogEntity::new(EntityKind::ORG_UNIT, 1, "A").with_parent(2),
                CatalogEntity::new(EntityKind::ORG_UNIT, 2, "B").with_parent(1),
            ])
            .unwrap();

        assert_eq!(store.expand_scope(&options(1, Scope::Children)).unwrap(), BTreeSet::from([1, 2]));
        assert_eq!(store.expand_scope(&options(1, Scope::Parents)).unwrap(), BTreeSet::from([1, 2]));
    }

    #[test]
    fn unknown_root_is_empty() {
        assert!(org_units().expand_scope(&options(99, Scope::Children)).unwrap().is_empty());
    }

    #[test]
    fn dangling_parent_stops_walk() {
        let store = InMemoryEntityStore::new(EntityKind::ORG_UNIT);
        store
            .insert(CatalogEntity::new(EntityKind::ORG_UNIT, 5, "Orphan").with_parent(404))
            .unwrap();
        assert_eq!(store.expand_scope(&options(5, Scope::Parents)).unwrap(), BTreeSet::from([5]));
    }

    #[test]
    fn rejects_other_kinds() {
        let store = org_units();
        let app = SelectionOptions::for_reference(&EntityReference::new(EntityKind::APPLICATION, 1));
        assert!(matches!(store.expand_scope(&app), Err(QueryError::UnsupportedKind { .. })));
        assert!(store
            .insert(CatalogEntity::new(EntityKind::APPLICATION, 9, "Ledger"))
            .is_err());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn flat_store_requires_exact_scope() {
        let store = InMemoryEntityStore::new(EntityKind::APPLICATION);
        store.insert(CatalogEntity::new(EntityKind::APPLICATION, 1, "Ledger")).unwrap();

        let exact = SelectionOptions::for_reference(&EntityReference::new(EntityKind::APPLICATION, 1));
        assert_eq!(store.expand_scope(&exact).unwrap(), BTreeSet::from([1]));
        assert!(matches!(
            store.expand_scope(&exact.with_scope(Scope::Children)),
            Err(QueryError::Selector(_))
        ));
    }

    #[test]
    fn remove_shrinks_store() {
        let store = org_units();
        assert!(store.remove(4).is_some());
        assert!(store.remove(4).is_none());
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }
}
