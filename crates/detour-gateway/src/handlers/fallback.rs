use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use super::health_handler;

/// The handler used when no redirect matches and the caller supplies none.
///
/// Serves `/` and `/health`; everything else is `404 Not Found`.
pub fn default_fallback() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
}

pub async fn root_handler() -> &'static str {
    "Hello, world!"
}

pub async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}
