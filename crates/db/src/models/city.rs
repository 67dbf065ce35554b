//! City (tenant) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use langmap_core::types::{DbId, Timestamp};

/// A row from the `cities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    /// URL-safe tenant key, e.g. `"nyc"`.
    pub slug: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new city.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCity {
    pub slug: String,
    pub name: String,
}
