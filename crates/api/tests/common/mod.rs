use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use langmap_api::cache::ListingCache;
use langmap_api::config::ServerConfig;
use langmap_api::router::build_app_router;
use langmap_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        import_max_rows: 5000,
        listing_cache_ttl_secs: 300,
    }
}

/// Build the full application router over `pool` with the default test
/// config.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Build the full application router with a custom config. Uses the same
/// middleware stack as the binary.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let cache = Arc::new(ListingCache::new(Duration::from_secs(
        config.listing_cache_ttl_secs,
    )));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache,
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
