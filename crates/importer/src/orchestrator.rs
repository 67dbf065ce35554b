//! Batch orchestration: tenant resolution, the row loop, failure policy,
//! aggregation, and cache invalidation.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use langmap_core::import::{
    stopped_at_row_message, tenant_not_found_message, ImportConfig, ImportResult, ImportRow,
    ImportSummary,
};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::invalidation::{CacheInvalidator, LANGUAGES_VIEW};
use crate::store::ImportStore;
use crate::worker::{import_row, RowContext};

/// Import `rows` into the tenant named by `config.tenant_key`.
///
/// Rows run strictly in input order, one at a time, so a row sees every
/// write made by the rows before it. With `skip_errors` unset the batch
/// stops at the first failed row; later rows are never attempted and have
/// no entry in `results`, but still count towards `failed`.
///
/// The languages view of the tenant is invalidated whenever the loop ran
/// to the end, or stopped after at least one row succeeded.
pub async fn import_batch<S, C>(
    store: &S,
    invalidator: &C,
    rows: &[ImportRow],
    config: &ImportConfig,
) -> ImportSummary
where
    S: ImportStore + ?Sized,
    C: CacheInvalidator + ?Sized,
{
    let span = tracing::info_span!(
        "import_batch",
        tenant_key = %config.tenant_key,
        rows = rows.len()
    );
    run_batch(store, invalidator, rows, config)
        .instrument(span)
        .await
}

/// Run [`import_batch`] on its own task.
///
/// The batch owns its inputs and keeps running if the returned handle is
/// dropped, so a caller that gives up (a request timeout, a closed
/// connection) can never interrupt a row between its create and
/// compensate steps.
pub fn spawn_import_batch<S, C>(
    store: Arc<S>,
    invalidator: Arc<C>,
    rows: Vec<ImportRow>,
    config: ImportConfig,
) -> JoinHandle<ImportSummary>
where
    S: ImportStore + 'static,
    C: CacheInvalidator + 'static,
{
    tokio::spawn(async move {
        import_batch(store.as_ref(), invalidator.as_ref(), &rows, &config).await
    })
}

async fn run_batch<S, C>(
    store: &S,
    invalidator: &C,
    rows: &[ImportRow],
    config: &ImportConfig,
) -> ImportSummary
where
    S: ImportStore + ?Sized,
    C: CacheInvalidator + ?Sized,
{
    if rows.is_empty() {
        return ImportSummary {
            error: Some("No rows to import".to_string()),
            ..Default::default()
        };
    }

    let config = config.resolve();
    if config.tenant_key.is_empty() {
        return ImportSummary::systemic_failure(rows, "Tenant key is required");
    }

    let tenant_id = match store.resolve_tenant(&config.tenant_key).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::warn!("Tenant not found");
            return ImportSummary::systemic_failure(
                rows,
                tenant_not_found_message(&config.tenant_key),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Tenant lookup failed");
            return ImportSummary::systemic_failure(
                rows,
                format!("Failed to resolve tenant {}: {e}", config.tenant_key),
            );
        }
    };

    let ctx = RowContext {
        tenant_id,
        locale: &config.locale,
        mappings: &config.taxonomy_mappings,
        update_existing: config.update_existing,
    };

    let mut summary = ImportSummary {
        total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let result = guarded_import_row(store, &ctx, row).await;

        if result.success {
            summary.successful += 1;
            summary.results.push(result);
            continue;
        }

        summary.failed += 1;
        let reason = result.error.clone().unwrap_or_default();
        summary.results.push(result);

        if !config.skip_errors {
            summary.failed = summary.total - summary.successful;
            summary.error = Some(stopped_at_row_message(row.row_number, &reason));
            tracing::warn!(
                row = row.row_number,
                attempted = summary.attempted(),
                successful = summary.successful,
                "Import stopped at failed row"
            );

            if summary.successful > 0 {
                invalidator
                    .invalidate(&config.tenant_key, LANGUAGES_VIEW)
                    .await;
            }
            return summary;
        }
    }

    tracing::info!(
        successful = summary.successful,
        failed = summary.failed,
        "Import finished"
    );
    invalidator
        .invalidate(&config.tenant_key, LANGUAGES_VIEW)
        .await;

    summary
}

/// Run the worker for one row, turning a panic anywhere below it into a
/// failed result.
async fn guarded_import_row<S>(store: &S, ctx: &RowContext<'_>, row: &ImportRow) -> ImportResult
where
    S: ImportStore + ?Sized,
{
    match AssertUnwindSafe(import_row(store, ctx, row))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(row = row.row_number, panic = %message, "Row worker panicked");
            ImportResult::failed(
                row.row_number,
                row.name.clone(),
                format!("Unexpected error: {message}"),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
