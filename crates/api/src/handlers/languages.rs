//! Handler for the cached per-city language listing.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use langmap_core::error::CoreError;
use langmap_core::import::{validate_locale, DEFAULT_LOCALE};
use langmap_db::repositories::{CityRepo, LanguageRepo};
use langmap_importer::LANGUAGES_VIEW;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the language listing.
#[derive(Debug, Deserialize)]
pub struct ListLanguagesParams {
    pub locale: Option<String>,
}

/// GET /api/v1/cities/{city_key}/languages
///
/// Served from the listing cache when warm; otherwise loaded and cached.
/// A malformed `locale` is rejected with 400 before the cache is touched.
pub async fn list_languages(
    State(state): State<AppState>,
    Path(city_key): Path<String>,
    Query(params): Query<ListLanguagesParams>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let locale = params
        .locale
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    validate_locale(&locale).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    if let Some(cached) = state.cache.get(&city_key, LANGUAGES_VIEW, &locale).await {
        tracing::debug!(%city_key, %locale, "Language listing served from cache");
        return Ok(Json(DataResponse { data: cached }));
    }

    let generation = state.cache.generation(&city_key, LANGUAGES_VIEW).await;
    let city = CityRepo::find_by_slug(&state.pool, &city_key)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "City",
            key: city_key.clone(),
        })?;

    let languages = LanguageRepo::list_for_city(&state.pool, city.id, &locale).await?;
    let data = serde_json::to_value(&languages)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize listing: {e}")))?;

    let stored = state
        .cache
        .put(&city_key, LANGUAGES_VIEW, &locale, generation, data.clone())
        .await;
    if !stored {
        tracing::debug!(%city_key, %locale, "Listing invalidated during load, not cached");
    }

    Ok(Json(DataResponse { data }))
}
