//! Per-row worker: sanitize, then create or update one language.
//!
//! The create path is a three-step saga (language, translation,
//! taxonomies). A translation failure deletes the new language again; a
//! taxonomy failure is logged and tolerated. The update path never
//! compensates, since the language existed before the call.

use langmap_core::import::{resolve_taxonomies, ImportResult, ImportRow, RowAction, TaxonomyMapping};
use langmap_core::sanitize::{sanitize_endonym, sanitize_iso_code, sanitize_name};
use langmap_core::types::DbId;

use crate::store::{ImportStore, LanguageMetadata, NewLanguage, StoreError};

/// Batch-wide inputs shared by every row.
#[derive(Debug, Clone)]
pub struct RowContext<'a> {
    pub tenant_id: DbId,
    pub locale: &'a str,
    pub mappings: &'a [TaxonomyMapping],
    pub update_existing: bool,
}

/// Sanitized values for one row.
struct CleanRow<'r> {
    row: &'r ImportRow,
    name: String,
    metadata: LanguageMetadata,
}

/// Write one row to the store and report the outcome.
///
/// Never returns an error: every failure becomes a failed [`ImportResult`].
pub async fn import_row<S>(store: &S, ctx: &RowContext<'_>, row: &ImportRow) -> ImportResult
where
    S: ImportStore + ?Sized,
{
    let name = match sanitize_name(row.name.as_deref()) {
        Ok(name) => name,
        Err(e) => {
            tracing::debug!(row = row.row_number, error = %e, "Row rejected by sanitizer");
            return ImportResult::failed(row.row_number, row.name.clone(), e.to_string());
        }
    };

    let clean = CleanRow {
        row,
        metadata: LanguageMetadata {
            endonym: sanitize_endonym(row.endonym.as_deref()),
            iso_code: sanitize_iso_code(row.iso_code.as_deref()),
        },
        name,
    };

    if !row.custom_fields.is_empty() {
        tracing::trace!(
            row = row.row_number,
            fields = row.custom_fields.len(),
            "Ignoring custom fields"
        );
    }

    let existing = match store
        .find_language_by_name(ctx.tenant_id, ctx.locale, &clean.name)
        .await
    {
        Ok(existing) => existing,
        Err(e) => {
            return clean.fail(format!("Failed to check for existing language: {e}"));
        }
    };

    match existing {
        Some(_) if !ctx.update_existing => {
            let error = format!("{} already exists", clean.name);
            clean.fail(error)
        }
        Some(language_id) => update_language(store, ctx, clean, language_id).await,
        None => create_language(store, ctx, clean).await,
    }
}

impl CleanRow<'_> {
    fn fail(self, error: String) -> ImportResult {
        ImportResult::failed(self.row.row_number, Some(self.name), error)
    }

    fn succeed(self, language_id: DbId, action: RowAction) -> ImportResult {
        tracing::debug!(
            row = self.row.row_number,
            language_id,
            action = %action,
            "Row imported"
        );
        ImportResult::succeeded(self.row.row_number, language_id, self.name, action)
    }
}

async fn update_language<S>(
    store: &S,
    ctx: &RowContext<'_>,
    clean: CleanRow<'_>,
    language_id: DbId,
) -> ImportResult
where
    S: ImportStore + ?Sized,
{
    if let Err(e) = store.update_language(language_id, &clean.metadata).await {
        return clean.fail(format!("Failed to update language: {e}"));
    }

    if let Err(e) = store
        .update_translation(language_id, ctx.locale, &clean.name)
        .await
    {
        return clean.fail(format!("Failed to update translation: {e}"));
    }

    if let Err(e) = reconcile_taxonomies(store, ctx, clean.row, language_id).await {
        return clean.fail(e.to_string());
    }

    clean.succeed(language_id, RowAction::Updated)
}

async fn create_language<S>(store: &S, ctx: &RowContext<'_>, clean: CleanRow<'_>) -> ImportResult
where
    S: ImportStore + ?Sized,
{
    let new_language = NewLanguage {
        tenant_id: ctx.tenant_id,
        endonym: clean.metadata.endonym.clone(),
        iso_code: clean.metadata.iso_code.clone(),
    };

    let language_id = match store.insert_language(&new_language).await {
        Ok(id) => id,
        Err(e) => return clean.fail(format!("Failed to create language: {e}")),
    };

    if let Err(e) = store
        .insert_translation(language_id, ctx.locale, &clean.name)
        .await
    {
        // The returned error stays the translation failure even if the
        // rollback also fails; orphans are only visible in the logs.
        if let Err(rollback_err) = store.delete_language(language_id).await {
            tracing::warn!(
                row = clean.row.row_number,
                language_id,
                error = %rollback_err,
                "Rollback of orphaned language failed"
            );
        }
        return clean.fail(format!("Failed to create translation: {e}"));
    }

    if let Err(e) = reconcile_taxonomies(store, ctx, clean.row, language_id).await {
        tracing::error!(
            row = clean.row.row_number,
            language_id,
            error = %e,
            "Taxonomy assignment failed; language kept without full taxonomy data"
        );
    }

    clean.succeed(language_id, RowAction::Created)
}

/// Which half of a taxonomy replacement failed.
#[derive(Debug, thiserror::Error)]
enum TaxonomyWriteError {
    #[error("Failed to clear taxonomies: {0}")]
    Clear(StoreError),

    #[error("Failed to assign taxonomies: {0}")]
    Assign(StoreError),
}

/// Replace a language's taxonomy assignments with the row's resolved set.
///
/// Always clears first, so a row that resolves nothing (including a batch
/// with no mappings) leaves the language unassigned. Unknown labels are
/// logged and skipped.
async fn reconcile_taxonomies<S>(
    store: &S,
    ctx: &RowContext<'_>,
    row: &ImportRow,
    language_id: DbId,
) -> Result<(), TaxonomyWriteError>
where
    S: ImportStore + ?Sized,
{
    let resolution = resolve_taxonomies(&row.taxonomies, ctx.mappings);
    for unresolved in &resolution.unresolved {
        tracing::warn!(
            row = row.row_number,
            column = %unresolved.external_column,
            label = %unresolved.label,
            "Unmapped taxonomy value skipped"
        );
    }

    store
        .delete_taxonomies(language_id)
        .await
        .map_err(TaxonomyWriteError::Clear)?;

    if !resolution.value_ids.is_empty() {
        store
            .insert_taxonomies(language_id, &resolution.value_ids)
            .await
            .map_err(TaxonomyWriteError::Assign)?;
    }

    Ok(())
}
