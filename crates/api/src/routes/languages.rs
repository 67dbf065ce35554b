//! Route definitions for per-city languages.
//!
//! Merged into the `/api/v1` tree by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{import, languages};
use crate::state::AppState;

/// Language routes.
///
/// ```text
/// GET    /cities/{city_key}/languages           -> list_languages (?locale)
/// POST   /cities/{city_key}/languages/import    -> import_languages
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities/{city_key}/languages", get(languages::list_languages))
        .route(
            "/cities/{city_key}/languages/import",
            post(import::import_languages),
        )
}
