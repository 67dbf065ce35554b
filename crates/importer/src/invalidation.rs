//! Hook for invalidating cached listing views after an import.

use async_trait::async_trait;

/// View name of a tenant's language listing.
pub const LANGUAGES_VIEW: &str = "languages";

/// Receives invalidation requests once per batch that wrote something.
///
/// Implementations must not fail the import: errors are theirs to log.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, tenant_key: &str, view_name: &str);
}

/// Invalidator for callers without a cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

#[async_trait]
impl CacheInvalidator for NoopInvalidator {
    async fn invalidate(&self, tenant_key: &str, view_name: &str) {
        tracing::trace!(tenant_key, view_name, "No cache to invalidate");
    }
}
