//! [`ImportStore`] backed by the Postgres repositories.

use async_trait::async_trait;
use langmap_core::types::DbId;
use langmap_db::models::language::{CreateLanguage, CreateLanguageTranslation, UpdateLanguage};
use langmap_db::repositories::{
    CityRepo, LanguageRepo, LanguageTaxonomyRepo, LanguageTranslationRepo,
};
use sqlx::PgPool;

use crate::store::{ImportStore, LanguageMetadata, NewLanguage, StoreError};

/// Postgres gateway. Tenants are cities, keyed by slug.
#[derive(Debug, Clone)]
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn resolve_tenant(&self, tenant_key: &str) -> Result<Option<DbId>, StoreError> {
        let city = CityRepo::find_by_slug(&self.pool, tenant_key).await?;
        Ok(city.map(|c| c.id))
    }

    async fn find_language_by_name(
        &self,
        tenant_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<Option<DbId>, StoreError> {
        let language =
            LanguageRepo::find_by_translation_name(&self.pool, tenant_id, locale, name).await?;
        Ok(language.map(|l| l.id))
    }

    async fn insert_language(&self, input: &NewLanguage) -> Result<DbId, StoreError> {
        let language = LanguageRepo::create(
            &self.pool,
            &CreateLanguage {
                city_id: input.tenant_id,
                endonym: input.endonym.clone(),
                iso_code: input.iso_code.clone(),
            },
        )
        .await?;
        Ok(language.id)
    }

    async fn update_language(
        &self,
        language_id: DbId,
        metadata: &LanguageMetadata,
    ) -> Result<(), StoreError> {
        let input = UpdateLanguage {
            endonym: metadata.endonym.clone(),
            iso_code: metadata.iso_code.clone(),
        };
        LanguageRepo::update(&self.pool, language_id, &input)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "Language",
                id: language_id,
            })?;
        Ok(())
    }

    async fn delete_language(&self, language_id: DbId) -> Result<(), StoreError> {
        if LanguageRepo::delete(&self.pool, language_id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "Language",
                id: language_id,
            })
        }
    }

    async fn insert_translation(
        &self,
        language_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<(), StoreError> {
        LanguageTranslationRepo::create(
            &self.pool,
            &CreateLanguageTranslation {
                language_id,
                locale: locale.to_string(),
                name: name.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    async fn update_translation(
        &self,
        language_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<(), StoreError> {
        if LanguageTranslationRepo::update_name(&self.pool, language_id, locale, name).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "LanguageTranslation",
                id: language_id,
            })
        }
    }

    async fn delete_taxonomies(&self, language_id: DbId) -> Result<(), StoreError> {
        let removed = LanguageTaxonomyRepo::delete_for_language(&self.pool, language_id).await?;
        tracing::trace!(language_id, removed, "Cleared taxonomy assignments");
        Ok(())
    }

    async fn insert_taxonomies(
        &self,
        language_id: DbId,
        value_ids: &[DbId],
    ) -> Result<(), StoreError> {
        LanguageTaxonomyRepo::batch_insert(&self.pool, language_id, value_ids).await?;
        Ok(())
    }

    async fn language_exists(&self, language_id: DbId) -> Result<bool, StoreError> {
        Ok(LanguageRepo::find_by_id(&self.pool, language_id)
            .await?
            .is_some())
    }
}
