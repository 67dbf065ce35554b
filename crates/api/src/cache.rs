//! In-process cache of per-city listing views.
//!
//! Entries are keyed by `(tenant_key, view_name)` and hold one serialized
//! payload per variant (for the languages view, the variant is the
//! locale). Imports drop every variant of a view at once through the
//! [`CacheInvalidator`] impl, and bump the view's generation so a listing
//! loaded before the import cannot be stored afterwards.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use langmap_importer::CacheInvalidator;
use tokio::sync::RwLock;

type ViewKey = (String, String);

struct CachedEntry {
    value: serde_json::Value,
    stored_at: Instant,
}

#[derive(Default)]
struct CachedView {
    variants: HashMap<String, CachedEntry>,
}

#[derive(Default)]
struct CacheState {
    views: HashMap<ViewKey, CachedView>,
    /// Bumped on every invalidation. Only views that were invalidated at
    /// least once have an entry; absent means generation 0.
    generations: HashMap<ViewKey, u64>,
}

impl CacheState {
    fn generation(&self, key: &ViewKey) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }
}

fn view_key(tenant_key: &str, view_name: &str) -> ViewKey {
    (tenant_key.to_string(), view_name.to_string())
}

/// TTL-bounded cache of listing views.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared through `AppState`.
///
/// Loaders read [`generation`](Self::generation) before querying the
/// database and hand it back to [`put`](Self::put). A payload loaded
/// before an invalidation is then discarded instead of cached.
pub struct ListingCache {
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Return a cached payload if present and younger than the TTL.
    pub async fn get(
        &self,
        tenant_key: &str,
        view_name: &str,
        variant: &str,
    ) -> Option<serde_json::Value> {
        let state = self.state.read().await;
        let entry = state
            .views
            .get(&view_key(tenant_key, view_name))?
            .variants
            .get(variant)?;

        (entry.stored_at.elapsed() < self.ttl).then(|| entry.value.clone())
    }

    /// Current invalidation generation of a view.
    pub async fn generation(&self, tenant_key: &str, view_name: &str) -> u64 {
        self.state
            .read()
            .await
            .generation(&view_key(tenant_key, view_name))
    }

    /// Store a payload loaded at `generation`.
    ///
    /// Returns `false` without storing when the view was invalidated since
    /// that generation was read. Expired entries of every view are swept
    /// on each call.
    pub async fn put(
        &self,
        tenant_key: &str,
        view_name: &str,
        variant: &str,
        generation: u64,
        value: serde_json::Value,
    ) -> bool {
        let key = view_key(tenant_key, view_name);
        let mut state = self.state.write().await;

        let ttl = self.ttl;
        state.views.retain(|_, view| {
            view.variants.retain(|_, entry| entry.stored_at.elapsed() < ttl);
            !view.variants.is_empty()
        });

        if state.generation(&key) != generation {
            return false;
        }

        state.views.entry(key).or_default().variants.insert(
            variant.to_string(),
            CachedEntry {
                value,
                stored_at: Instant::now(),
            },
        );
        true
    }

    /// Drop every variant of one view and advance its generation.
    /// Returns whether anything was cached.
    pub async fn remove_view(&self, tenant_key: &str, view_name: &str) -> bool {
        let key = view_key(tenant_key, view_name);
        let mut state = self.state.write().await;
        let removed = state.views.remove(&key).is_some();
        *state.generations.entry(key).or_insert(0) += 1;
        removed
    }

    /// Number of cached views across all tenants.
    pub async fn view_count(&self) -> usize {
        self.state.read().await.views.len()
    }

    /// Number of cached variants across all views.
    pub async fn entry_count(&self) -> usize {
        self.state
            .read()
            .await
            .views
            .values()
            .map(|view| view.variants.len())
            .sum()
    }
}

#[async_trait]
impl CacheInvalidator for ListingCache {
    async fn invalidate(&self, tenant_key: &str, view_name: &str) {
        let removed = self.remove_view(tenant_key, view_name).await;
        tracing::debug!(tenant_key, view_name, removed, "Listing view invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn put_now(
        cache: &ListingCache,
        tenant: &str,
        view: &str,
        variant: &str,
        value: serde_json::Value,
    ) {
        let generation = cache.generation(tenant, view).await;
        assert!(cache.put(tenant, view, variant, generation, value).await);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = ListingCache::new(Duration::from_secs(60));
        put_now(&cache, "nyc", "languages", "en", json!(["Spanish"])).await;

        assert_eq!(
            cache.get("nyc", "languages", "en").await,
            Some(json!(["Spanish"]))
        );
        assert_eq!(cache.get("nyc", "languages", "es").await, None);
        assert_eq!(cache.get("berlin", "languages", "en").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_not_served() {
        let cache = ListingCache::new(Duration::ZERO);
        put_now(&cache, "nyc", "languages", "en", json!([])).await;

        assert_eq!(cache.get("nyc", "languages", "en").await, None);
    }

    #[tokio::test]
    async fn test_put_sweeps_expired_entries() {
        let cache = ListingCache::new(Duration::from_millis(20));
        put_now(&cache, "nyc", "languages", "en", json!([1])).await;
        put_now(&cache, "nyc", "languages", "es", json!([2])).await;
        put_now(&cache, "berlin", "languages", "en", json!([3])).await;
        assert_eq!(cache.entry_count().await, 3);

        tokio::time::sleep(Duration::from_millis(40)).await;
        put_now(&cache, "nyc", "languages", "fr", json!([4])).await;

        assert_eq!(cache.entry_count().await, 1);
        assert_eq!(cache.view_count().await, 1);
        assert_eq!(cache.get("nyc", "languages", "fr").await, Some(json!([4])));
    }

    #[tokio::test]
    async fn test_invalidate_drops_every_variant_of_view() {
        let cache = ListingCache::new(Duration::from_secs(60));
        put_now(&cache, "nyc", "languages", "en", json!([1])).await;
        put_now(&cache, "nyc", "languages", "es", json!([2])).await;
        put_now(&cache, "nyc", "neighborhoods", "en", json!([3])).await;
        put_now(&cache, "berlin", "languages", "en", json!([4])).await;

        cache.invalidate("nyc", "languages").await;

        assert_eq!(cache.get("nyc", "languages", "en").await, None);
        assert_eq!(cache.get("nyc", "languages", "es").await, None);
        assert!(cache.get("nyc", "neighborhoods", "en").await.is_some());
        assert!(cache.get("berlin", "languages", "en").await.is_some());
        assert_eq!(cache.view_count().await, 2);
    }

    #[tokio::test]
    async fn test_invalidate_missing_view_is_harmless() {
        let cache = ListingCache::new(Duration::from_secs(60));
        assert!(!cache.remove_view("nyc", "languages").await);
        cache.invalidate("nyc", "languages").await;
        assert_eq!(cache.view_count().await, 0);
    }

    #[tokio::test]
    async fn test_load_started_before_invalidation_is_not_cached() {
        let cache = ListingCache::new(Duration::from_secs(60));

        // A listing load reads the generation, then an import lands
        // before the loaded payload is stored.
        let generation = cache.generation("nyc", "languages").await;
        cache.invalidate("nyc", "languages").await;
        let stored = cache
            .put("nyc", "languages", "en", generation, json!(["Bengali"]))
            .await;

        assert!(!stored);
        assert_eq!(cache.get("nyc", "languages", "en").await, None);

        // The next load sees the new generation and caches normally.
        put_now(&cache, "nyc", "languages", "en", json!(["Bengali", "Spanish"])).await;
        assert_eq!(
            cache.get("nyc", "languages", "en").await,
            Some(json!(["Bengali", "Spanish"]))
        );
    }

    #[tokio::test]
    async fn test_invalidation_of_other_view_does_not_block_put() {
        let cache = ListingCache::new(Duration::from_secs(60));
        let generation = cache.generation("nyc", "languages").await;
        cache.invalidate("berlin", "languages").await;

        assert!(
            cache
                .put("nyc", "languages", "en", generation, json!([]))
                .await
        );
    }
}
