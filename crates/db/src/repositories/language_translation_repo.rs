//! Repository for the `language_translations` table.

use langmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::language::{CreateLanguageTranslation, LanguageTranslation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, language_id, locale, name, created_at, updated_at";

/// Provides CRUD operations for language translations.
pub struct LanguageTranslationRepo;

impl LanguageTranslationRepo {
    /// Insert a translation, returning the created row.
    ///
    /// Fails with a unique violation (`uq_language_translations_language_locale`)
    /// if the language already has a translation for the locale.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLanguageTranslation,
    ) -> Result<LanguageTranslation, sqlx::Error> {
        let query = format!(
            "INSERT INTO language_translations (language_id, locale, name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LanguageTranslation>(&query)
            .bind(input.language_id)
            .bind(&input.locale)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find the translation of a language for one locale.
    pub async fn find(
        pool: &PgPool,
        language_id: DbId,
        locale: &str,
    ) -> Result<Option<LanguageTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM language_translations WHERE language_id = $1 AND locale = $2"
        );
        sqlx::query_as::<_, LanguageTranslation>(&query)
            .bind(language_id)
            .bind(locale)
            .fetch_optional(pool)
            .await
    }

    /// List every translation of a language, ordered by locale.
    pub async fn list_for_language(
        pool: &PgPool,
        language_id: DbId,
    ) -> Result<Vec<LanguageTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM language_translations WHERE language_id = $1 ORDER BY locale"
        );
        sqlx::query_as::<_, LanguageTranslation>(&query)
            .bind(language_id)
            .fetch_all(pool)
            .await
    }

    /// Set the display name for an existing (language, locale) pair.
    ///
    /// Returns `true` if a row was updated.
    pub async fn update_name(
        pool: &PgPool,
        language_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE language_translations SET name = $3, updated_at = NOW() \
             WHERE language_id = $1 AND locale = $2",
        )
        .bind(language_id)
        .bind(locale)
        .bind(name)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
