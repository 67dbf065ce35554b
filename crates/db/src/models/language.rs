//! Language and language translation models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use langmap_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `languages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Language {
    pub id: DbId,
    pub city_id: DbId,
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `language_translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LanguageTranslation {
    pub id: DbId,
    pub language_id: DbId,
    pub locale: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A language joined with its display name for one locale. Used by the
/// city listing view.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LanguageListItem {
    pub id: DbId,
    pub name: String,
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for inserting a language.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLanguage {
    pub city_id: DbId,
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
}

/// DTO for overwriting a language's metadata.
///
/// Unlike the patch DTOs elsewhere, fields are written as given: `None`
/// clears the column.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLanguage {
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
}

/// DTO for inserting a translation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLanguageTranslation {
    pub language_id: DbId,
    pub locale: String,
    pub name: String,
}
