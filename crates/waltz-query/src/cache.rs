//! Broker cache for selector queries using moka
//!
//! Results are keyed on [`SelectionKey`], so two requests whose options
//! differ only in reference decoration share one entry. Failed queries
//! are never cached.

use crate::error::QueryResult;
use crate::service::SelectorQuery;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use waltz_selector::{SelectionKey, SelectionOptions, SelectorConfig};

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Cached entity result sets
    pub entity_entries: u64,
    /// Cached id result sets
    pub id_entries: u64,
}

/// Caching decorator over any [`SelectorQuery`]
///
/// Provides:
/// - Sharing of results between structurally identical selectors
/// - Bounded capacity with LRU-style eviction
/// - Optional time-based expiration (TTL)
pub struct CachedSelectorQuery<Q: SelectorQuery> {
    inner: Q,
    entities: Cache<SelectionKey, Arc<Vec<Q::Entity>>>,
    ids: Cache<SelectionKey, Arc<Vec<i64>>>,
}

impl<Q: SelectorQuery> CachedSelectorQuery<Q> {
    /// Wrap `inner` using capacity and TTL from `config`
    #[must_use]
    pub fn new(inner: Q, config: &SelectorConfig) -> Self {
        Self {
            inner,
            entities: build_cache(config),
            ids: build_cache(config),
        }
    }

    /// Wrapped service
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &Q {
        &self.inner
    }

    /// Drop cached results for one selector
    pub async fn invalidate(&self, options: &SelectionOptions) {
        let key = options.cache_key();
        self.entities.invalidate(&key).await;
        self.ids.invalidate(&key).await;
    }

    /// Drop all cached results
    #[inline]
    pub fn invalidate_all(&self) {
        self.entities.invalidate_all();
        self.ids.invalidate_all();
    }

    /// Check if results for `options` are cached
    #[must_use]
    pub async fn contains(&self, options: &SelectionOptions) -> bool {
        let key = options.cache_key();
        self.entities.get(&key).await.is_some() || self.ids.get(&key).await.is_some()
    }

    /// Get cache statistics
    ///
    /// Flushes moka's pending maintenance first so counts are current.
    pub async fn stats(&self) -> CacheStats {
        self.entities.run_pending_tasks().await;
        self.ids.run_pending_tasks().await;
        CacheStats {
            entity_entries: self.entities.entry_count(),
            id_entries: self.ids.entry_count(),
        }
    }
}

impl<Q: SelectorQuery + fmt::Debug> fmt::Debug for CachedSelectorQuery<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSelectorQuery")
            .field("inner", &self.inner)
            .field("entity_entries", &self.entities.entry_count())
            .field("id_entries", &self.ids.entry_count())
            .finish()
    }
}

fn build_cache<V>(config: &SelectorConfig) -> Cache<SelectionKey, V>
where
    V: Clone + Send + Sync + 'static,
{
    let builder = Cache::builder().max_capacity(config.cache_max_capacity);
    match config.cache_ttl() {
        Some(ttl) => builder.time_to_live(ttl).build(),
        None => builder.build(),
    }
}

async fn try_get_or_insert_with<T, F, Fut>(
    cache: &Cache<SelectionKey, Arc<Vec<T>>>,
    key: SelectionKey,
    f: F,
) -> QueryResult<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = QueryResult<Vec<T>>>,
{
    if let Some(cached) = cache.get(&key).await {
        tracing::debug!(%key, "selector cache hit");
        return Ok(cached.as_ref().clone());
    }

    tracing::debug!(%key, "selector cache miss");
    let fresh = f().await?;
    cache.insert(key, Arc::new(fresh.clone())).await;
    Ok(fresh)
}

#[async_trait]
impl<Q: SelectorQuery> SelectorQuery for CachedSelectorQuery<Q> {
    type Entity = Q::Entity;

    async fn find_for_selector(&self, options: &SelectionOptions) -> QueryResult<Vec<Q::Entity>> {
        try_get_or_insert_with(&self.entities, options.cache_key(), || {
            self.inner.find_for_selector(options)
        })
        .await
    }

    async fn find_by_id_selector(&self, options: &SelectionOptions) -> QueryResult<Vec<i64>> {
        try_get_or_insert_with(&self.ids, options.cache_key(), || {
            self.inner.find_by_id_selector(options)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use waltz_model::{EntityKind, EntityReference};
    use waltz_selector::build_selection_options;

    #[derive(Debug, Default)]
    struct CountingQuery {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SelectorQuery for CountingQuery {
        type Entity = EntityReference;

        async fn find_for_selector(
            &self,
            options: &SelectionOptions,
        ) -> QueryResult<Vec<EntityReference>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(QueryError::Backend("unavailable".into()));
            }
            Ok(vec![options.entity_reference().clone()])
        }

        async fn find_by_id_selector(&self, options: &SelectionOptions) -> QueryResult<Vec<i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![options.entity_reference().id()])
        }
    }

    #[tokio::test]
    async fn identical_selectors_hit_backend_once() {
        let cached = CachedSelectorQuery::new(CountingQuery::default(), &SelectorConfig::default());

        let plain = build_selection_options(&json!({ "id": 1, "kind": "APPLICATION" }), None, None, None)
            .unwrap();
        let decorated = build_selection_options(
            &json!({ "id": 1, "kind": "APPLICATION", "name": "Ledger" }),
            None,
            None,
            None,
        )
        .unwrap();

        let first = cached.find_for_selector(&plain).await.unwrap();
        let second = cached.find_for_selector(&decorated).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);
        assert!(cached.contains(&plain).await);
    }

    #[tokio::test]
    async fn id_and_entity_results_are_cached_separately() {
        let cached = CachedSelectorQuery::new(CountingQuery::default(), &SelectorConfig::default());
        let options =
            SelectionOptions::for_reference(&EntityReference::new(EntityKind::APPLICATION, 7));

        assert_eq!(cached.find_by_id_selector(&options).await.unwrap(), vec![7]);
        assert_eq!(cached.find_by_id_selector(&options).await.unwrap(), vec![7]);
        cached.find_for_selector(&options).await.unwrap();

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            cached.stats().await,
            CacheStats {
                entity_entries: 1,
                id_entries: 1
            }
        );
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let backend = CountingQuery {
            fail: true,
            ..CountingQuery::default()
        };
        let cached = CachedSelectorQuery::new(backend, &SelectorConfig::default());
        let options =
            SelectionOptions::for_reference(&EntityReference::new(EntityKind::APPLICATION, 7));

        assert!(cached.find_for_selector(&options).await.is_err());
        assert!(cached.find_for_selector(&options).await.is_err());
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
        assert!(!cached.contains(&options).await);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let cached = CachedSelectorQuery::new(CountingQuery::default(), &SelectorConfig::default());
        let options =
            SelectionOptions::for_reference(&EntityReference::new(EntityKind::APPLICATION, 3));

        cached.find_for_selector(&options).await.unwrap();
        cached.invalidate(&options).await;
        cached.find_for_selector(&options).await.unwrap();

        cached.invalidate_all();
        cached.find_for_selector(&options).await.unwrap();

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 3);
    }
}
