//! Repository for the `languages` table.
//!
//! Name lookups join through `language_translations`, since a language's
//! display name lives there rather than on the language row.

use langmap_core::types::DbId;
use sqlx::PgPool;

use crate::models::language::{CreateLanguage, Language, LanguageListItem, UpdateLanguage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, city_id, endonym, iso_code, created_at, updated_at";

/// Provides CRUD operations for languages.
pub struct LanguageRepo;

impl LanguageRepo {
    /// Insert a new language, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLanguage) -> Result<Language, sqlx::Error> {
        let query = format!(
            "INSERT INTO languages (city_id, endonym, iso_code)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Language>(&query)
            .bind(input.city_id)
            .bind(&input.endonym)
            .bind(&input.iso_code)
            .fetch_one(pool)
            .await
    }

    /// Find a language by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Language>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM languages WHERE id = $1");
        sqlx::query_as::<_, Language>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the language in a city whose translation for `locale` is
    /// exactly `name`. Returns the oldest match if several exist.
    pub async fn find_by_translation_name(
        pool: &PgPool,
        city_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<Option<Language>, sqlx::Error> {
        sqlx::query_as::<_, Language>(
            "SELECT l.id, l.city_id, l.endonym, l.iso_code, l.created_at, l.updated_at \
             FROM languages l \
             JOIN language_translations t ON t.language_id = l.id \
             WHERE l.city_id = $1 AND t.locale = $2 AND t.name = $3 \
             ORDER BY l.id \
             LIMIT 1",
        )
        .bind(city_id)
        .bind(locale)
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// List a city's languages with their display names for `locale`,
    /// ordered by name. Languages without a translation in that locale
    /// are omitted.
    pub async fn list_for_city(
        pool: &PgPool,
        city_id: DbId,
        locale: &str,
    ) -> Result<Vec<LanguageListItem>, sqlx::Error> {
        sqlx::query_as::<_, LanguageListItem>(
            "SELECT l.id, t.name, l.endonym, l.iso_code, l.updated_at \
             FROM languages l \
             JOIN language_translations t ON t.language_id = l.id AND t.locale = $2 \
             WHERE l.city_id = $1 \
             ORDER BY t.name, l.id",
        )
        .bind(city_id)
        .bind(locale)
        .fetch_all(pool)
        .await
    }

    /// Overwrite a language's endonym and ISO code and bump `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLanguage,
    ) -> Result<Option<Language>, sqlx::Error> {
        let query = format!(
            "UPDATE languages SET
                endonym = $2,
                iso_code = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Language>(&query)
            .bind(id)
            .bind(&input.endonym)
            .bind(&input.iso_code)
            .fetch_optional(pool)
            .await
    }

    /// Delete a language by ID. Cascades to translations and taxonomy
    /// assignments. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the languages that belong to a city.
    pub async fn count_for_city(pool: &PgPool, city_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM languages WHERE city_id = $1")
            .bind(city_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
