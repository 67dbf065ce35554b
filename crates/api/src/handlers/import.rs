//! Handler for bulk language import.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use langmap_core::error::CoreError;
use langmap_core::import::{
    validate_batch_size, validate_import_config, ImportConfig, ImportRow, ImportSummary,
};
use langmap_importer::{spawn_import_batch, PgImportStore};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a language import.
#[derive(Debug, Deserialize)]
pub struct ImportLanguagesRequest {
    pub rows: Vec<ImportRow>,
    /// Batch options. `tenant_key` is ignored; the city in the path wins.
    #[serde(default)]
    pub config: ImportConfig,
}

/// POST /api/v1/cities/{city_key}/languages/import
///
/// Malformed configs and oversized batches are rejected with 400. Anything
/// that happens once the batch starts, including an unknown city, is
/// reported inside the returned summary.
///
/// The batch runs on its own task. If the request times out or the client
/// goes away, the batch still finishes and invalidates the listing.
pub async fn import_languages(
    State(state): State<AppState>,
    Path(city_key): Path<String>,
    Json(input): Json<ImportLanguagesRequest>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let mut config = input.config;
    config.tenant_key = city_key;

    validate_import_config(&config).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_batch_size(input.rows.len(), state.config.import_max_rows)
        .map_err(AppError::BadRequest)?;

    let city_key = config.tenant_key.clone();
    let store = Arc::new(PgImportStore::new(state.pool.clone()));
    let summary = spawn_import_batch(store, state.cache.clone(), input.rows, config)
        .await
        .map_err(|e| AppError::InternalError(format!("Import task failed: {e}")))?;

    tracing::info!(
        %city_key,
        total = summary.total,
        successful = summary.successful,
        failed = summary.failed,
        status = %summary.status(),
        "Language import finished"
    );

    Ok(Json(DataResponse { data: summary }))
}
