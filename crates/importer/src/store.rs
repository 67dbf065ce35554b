//! The storage gateway consumed by the importer.
//!
//! Every method is a single round trip. Nothing here groups calls into a
//! transaction; callers compose them and compensate on failure.

use async_trait::async_trait;
use langmap_core::types::DbId;

/// Failure reported by an [`ImportStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{0}")]
    Backend(String),
}

/// Values for a language row about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLanguage {
    pub tenant_id: DbId,
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
}

/// Replacement metadata for an existing language. `None` clears a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMetadata {
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
}

/// Typed per-table operations the importer needs.
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Map a tenant key to its ID, or `None` if no such tenant exists.
    async fn resolve_tenant(&self, tenant_key: &str) -> Result<Option<DbId>, StoreError>;

    /// Find a tenant's language whose `locale` translation equals `name`.
    async fn find_language_by_name(
        &self,
        tenant_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<Option<DbId>, StoreError>;

    async fn insert_language(&self, input: &NewLanguage) -> Result<DbId, StoreError>;

    /// Overwrite metadata and bump the updated timestamp.
    async fn update_language(
        &self,
        language_id: DbId,
        metadata: &LanguageMetadata,
    ) -> Result<(), StoreError>;

    async fn delete_language(&self, language_id: DbId) -> Result<(), StoreError>;

    async fn insert_translation(
        &self,
        language_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<(), StoreError>;

    async fn update_translation(
        &self,
        language_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<(), StoreError>;

    /// Remove every taxonomy assignment of a language.
    async fn delete_taxonomies(&self, language_id: DbId) -> Result<(), StoreError>;

    /// Assign all `value_ids` to a language in one batch.
    async fn insert_taxonomies(&self, language_id: DbId, value_ids: &[DbId])
        -> Result<(), StoreError>;

    async fn language_exists(&self, language_id: DbId) -> Result<bool, StoreError>;
}
