use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;
use axum::Router;
use detour_core::Resolver;
use tower::Service;
use tower_http::trace::TraceLayer;

use crate::redirect::RedirectService;

pub struct App {}

impl App {
    /// Builds the request pipeline: redirect lookups first, `fallback` for
    /// every path without a mapping.
    pub fn router<F>(resolver: Arc<Resolver>, fallback: F) -> Router
    where
        F: Service<Request, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        F::Future: Send + 'static,
    {
        Router::new()
            .fallback_service(RedirectService::new(resolver, fallback))
            .layer(TraceLayer::new_for_http())
    }
}
