//! Repository for the `language_taxonomies` junction table.

use langmap_core::types::DbId;
use sqlx::PgPool;

/// Provides assignment operations between languages and taxonomy values.
pub struct LanguageTaxonomyRepo;

impl LanguageTaxonomyRepo {
    /// Remove every taxonomy assignment of a language. Returns the number
    /// of rows deleted.
    pub async fn delete_for_language(pool: &PgPool, language_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM language_taxonomies WHERE language_id = $1")
            .bind(language_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Insert assignments for all `value_ids` in one statement. Existing
    /// pairs are left untouched. Returns the number of rows inserted.
    pub async fn batch_insert(
        pool: &PgPool,
        language_id: DbId,
        value_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if value_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "INSERT INTO language_taxonomies (language_id, taxonomy_value_id) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT (language_id, taxonomy_value_id) DO NOTHING",
        )
        .bind(language_id)
        .bind(value_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List the taxonomy value IDs assigned to a language, ascending.
    pub async fn list_value_ids(
        pool: &PgPool,
        language_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT taxonomy_value_id FROM language_taxonomies \
             WHERE language_id = $1 ORDER BY taxonomy_value_id",
        )
        .bind(language_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
