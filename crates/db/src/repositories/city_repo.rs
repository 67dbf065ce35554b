//! Repository for the `cities` table.

use sqlx::PgPool;

use crate::models::city::{City, CreateCity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, name, created_at, updated_at";

/// Provides lookups and creation for cities.
pub struct CityRepo;

impl CityRepo {
    /// Insert a new city, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCity) -> Result<City, sqlx::Error> {
        let query = format!(
            "INSERT INTO cities (slug, name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a city by its tenant key.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<City>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cities WHERE slug = $1");
        sqlx::query_as::<_, City>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
