//! Types, defaults, and pure helpers for the bulk language importer.
//!
//! This module has zero external dependencies (no DB, no async, no I/O).
//! It provides:
//!
//! - The row, config, per-row result, and batch summary types.
//! - Config defaults and caller-side config validation.
//! - Taxonomy label resolution against the configured value maps.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ── Constants ────────────────────────────────────────────────────────

/// Locale used when the config does not name one.
pub const DEFAULT_LOCALE: &str = "en";

/// Maximum number of taxonomy mappings accepted in one config.
pub const MAX_TAXONOMY_MAPPINGS: usize = 50;

/// Default upper bound on rows per batch enforced by callers.
pub const DEFAULT_MAX_IMPORT_ROWS: usize = 5000;

static LOCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").expect("valid regex"));

// ── Input types ──────────────────────────────────────────────────────

/// One pre-parsed input record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based position in the source file, used in error reporting.
    pub row_number: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub endonym: Option<String>,
    #[serde(default)]
    pub iso_code: Option<String>,
    /// External column name -> external category label.
    #[serde(default)]
    pub taxonomies: HashMap<String, String>,
    /// Opaque passthrough columns. Carried but never written.
    #[serde(default)]
    pub custom_fields: serde_json::Map<String, serde_json::Value>,
}

/// Maps one external column onto an internal taxonomy category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyMapping {
    pub external_column: String,
    pub internal_category_id: DbId,
    /// External label -> internal taxonomy value id.
    #[serde(default)]
    pub value_map: HashMap<String, DbId>,
}

/// Batch configuration as supplied by the caller. Unset fields fall back
/// to the defaults applied by [`ImportConfig::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub tenant_key: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub taxonomy_mappings: Option<Vec<TaxonomyMapping>>,
    #[serde(default)]
    pub skip_errors: Option<bool>,
    #[serde(default)]
    pub update_existing: Option<bool>,
}

/// [`ImportConfig`] with every default applied.
#[derive(Debug, Clone)]
pub struct ResolvedImportConfig {
    pub tenant_key: String,
    pub locale: String,
    pub taxonomy_mappings: Vec<TaxonomyMapping>,
    /// `false` stops the batch at the first failed row.
    pub skip_errors: bool,
    /// `false` rejects rows whose name already exists.
    pub update_existing: bool,
}

impl ImportConfig {
    pub fn resolve(&self) -> ResolvedImportConfig {
        ResolvedImportConfig {
            tenant_key: self.tenant_key.trim().to_string(),
            locale: self
                .locale
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            taxonomy_mappings: self
                .taxonomy_mappings
                .iter()
                .flatten()
                .map(|mapping| TaxonomyMapping {
                    external_column: mapping.external_column.trim().to_string(),
                    ..mapping.clone()
                })
                .collect(),
            skip_errors: self.skip_errors.unwrap_or(false),
            update_existing: self.update_existing.unwrap_or(false),
        }
    }
}

// ── Output types ─────────────────────────────────────────────────────

/// Which write path a successful row took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    Created,
    Updated,
}

impl RowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl std::fmt::Display for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one attempted row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub row_number: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Sanitized name on success, raw name on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RowAction>,
}

impl ImportResult {
    pub fn succeeded(row_number: usize, entity_id: DbId, name: String, action: RowAction) -> Self {
        Self {
            row_number,
            success: true,
            entity_id: Some(entity_id),
            error: None,
            name: Some(name),
            action: Some(action),
        }
    }

    pub fn failed(row_number: usize, name: Option<String>, error: impl Into<String>) -> Self {
        Self {
            row_number,
            success: false,
            entity_id: None,
            error: Some(error.into()),
            name,
            action: None,
        }
    }
}

/// Overall state of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Every row succeeded.
    Completed,
    /// Some rows succeeded and some failed or were never attempted.
    Partial,
    /// No row succeeded.
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate outcome returned to the caller. Never persisted.
///
/// `total == successful + failed` always holds. When a fail-fast abort
/// leaves rows unattempted, those rows count as failed but have no entry
/// in `results`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ImportResult>,
    /// Set when the batch could not proceed or was stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportSummary {
    /// Summary for a batch that could not start. Every row is marked
    /// failed with the same message.
    pub fn systemic_failure(rows: &[ImportRow], error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            total: rows.len(),
            successful: 0,
            failed: rows.len(),
            results: rows
                .iter()
                .map(|row| ImportResult::failed(row.row_number, row.name.clone(), error.clone()))
                .collect(),
            error: Some(error),
        }
    }

    /// Number of rows that were actually attempted.
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn status(&self) -> ImportStatus {
        if self.successful == 0 {
            ImportStatus::Failed
        } else if self.failed == 0 && self.error.is_none() {
            ImportStatus::Completed
        } else {
            ImportStatus::Partial
        }
    }
}

/// Message used when a batch stops at a failed row.
pub fn stopped_at_row_message(row_number: usize, reason: &str) -> String {
    format!("Import stopped at row {row_number}: {reason}")
}

/// Message used when the tenant key does not resolve.
pub fn tenant_not_found_message(tenant_key: &str) -> String {
    format!("Tenant not found: {tenant_key}")
}

// ── Taxonomy resolution ──────────────────────────────────────────────

/// A taxonomy label that had no entry in its mapping's value map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLabel {
    pub external_column: String,
    pub label: String,
}

/// Result of resolving one row's taxonomy columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyResolution {
    /// Resolved internal value ids, in mapping order, without duplicates.
    pub value_ids: Vec<DbId>,
    pub unresolved: Vec<UnresolvedLabel>,
}

/// Resolve a row's external taxonomy labels through the configured mappings.
///
/// Mappings whose column is absent from the row are skipped. Labels are
/// trimmed before lookup; blank labels count as absent.
pub fn resolve_taxonomies(
    row_taxonomies: &HashMap<String, String>,
    mappings: &[TaxonomyMapping],
) -> TaxonomyResolution {
    let mut resolution = TaxonomyResolution::default();
    let mut seen = HashSet::new();

    for mapping in mappings {
        let Some(raw) = row_taxonomies.get(&mapping.external_column) else {
            continue;
        };
        let label = raw.trim();
        if label.is_empty() {
            continue;
        }

        match mapping.value_map.get(label) {
            Some(&value_id) => {
                if seen.insert(value_id) {
                    resolution.value_ids.push(value_id);
                }
            }
            None => resolution.unresolved.push(UnresolvedLabel {
                external_column: mapping.external_column.clone(),
                label: label.to_string(),
            }),
        }
    }

    resolution
}

// ── Validation ───────────────────────────────────────────────────────

/// Validate a config before handing it to the importer.
///
/// The importer itself only guards against a missing tenant key; callers
/// use this to reject malformed configs up front.
pub fn validate_import_config(config: &ImportConfig) -> Result<(), String> {
    if config.tenant_key.trim().is_empty() {
        return Err("Tenant key is required".to_string());
    }

    if let Some(locale) = &config.locale {
        validate_locale(locale)?;
    }

    let mappings = config.taxonomy_mappings.as_deref().unwrap_or_default();
    if mappings.len() > MAX_TAXONOMY_MAPPINGS {
        return Err(format!(
            "Config exceeds maximum of {MAX_TAXONOMY_MAPPINGS} taxonomy mappings"
        ));
    }

    let mut columns = HashSet::new();
    for (i, mapping) in mappings.iter().enumerate() {
        let column = mapping.external_column.trim();
        if column.is_empty() {
            return Err(format!("Taxonomy mapping at index {i} has an empty column name"));
        }
        if !columns.insert(column) {
            return Err(format!("Taxonomy column '{column}' is mapped more than once"));
        }
    }

    Ok(())
}

/// Check a locale code such as `en` or `pt-BR`.
pub fn validate_locale(locale: &str) -> Result<(), String> {
    if !LOCALE_RE.is_match(locale) {
        return Err(format!(
            "Invalid locale '{locale}'. Expected a code like 'en' or 'pt-BR'"
        ));
    }
    Ok(())
}

/// Validate the number of rows in a batch against an upper bound.
pub fn validate_batch_size(rows: usize, max_rows: usize) -> Result<(), String> {
    if rows > max_rows {
        return Err(format!(
            "Batch of {rows} rows exceeds maximum of {max_rows} rows"
        ));
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────
