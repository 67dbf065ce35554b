//! Repository for the `taxonomy_categories` and `taxonomy_values` tables.

use sqlx::PgPool;

use crate::models::taxonomy::{
    CreateTaxonomyCategory, CreateTaxonomyValue, TaxonomyCategory, TaxonomyValue,
};

const CATEGORY_COLUMNS: &str = "id, city_id, slug, name, created_at, updated_at";

const VALUE_COLUMNS: &str = "id, category_id, slug, name, created_at, updated_at";

/// Provides creation of taxonomy categories and values.
pub struct TaxonomyRepo;

impl TaxonomyRepo {
    /// Insert a taxonomy category, returning the created row.
    pub async fn create_category(
        pool: &PgPool,
        input: &CreateTaxonomyCategory,
    ) -> Result<TaxonomyCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO taxonomy_categories (city_id, slug, name)
             VALUES ($1, $2, $3)
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, TaxonomyCategory>(&query)
            .bind(input.city_id)
            .bind(&input.slug)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Insert a taxonomy value, returning the created row.
    pub async fn create_value(
        pool: &PgPool,
        input: &CreateTaxonomyValue,
    ) -> Result<TaxonomyValue, sqlx::Error> {
        let query = format!(
            "INSERT INTO taxonomy_values (category_id, slug, name)
             VALUES ($1, $2, $3)
             RETURNING {VALUE_COLUMNS}"
        );
        sqlx::query_as::<_, TaxonomyValue>(&query)
            .bind(input.category_id)
            .bind(&input.slug)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }
}
