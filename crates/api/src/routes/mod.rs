pub mod health;
pub mod languages;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /cities/{city_key}/languages            cached listing (GET)
/// /cities/{city_key}/languages/import     bulk import (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(languages::router())
}
