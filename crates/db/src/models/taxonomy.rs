//! Taxonomy category, value, and language assignment models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use langmap_core::types::{DbId, Timestamp};

/// A row from the `taxonomy_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaxonomyCategory {
    pub id: DbId,
    pub city_id: DbId,
    pub slug: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `taxonomy_values` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaxonomyValue {
    pub id: DbId,
    pub category_id: DbId,
    pub slug: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `language_taxonomies` junction table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LanguageTaxonomy {
    pub id: DbId,
    pub language_id: DbId,
    pub taxonomy_value_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a taxonomy category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaxonomyCategory {
    pub city_id: DbId,
    pub slug: String,
    pub name: String,
}

/// DTO for creating a taxonomy value.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaxonomyValue {
    pub category_id: DbId,
    pub slug: String,
    pub name: String,
}
