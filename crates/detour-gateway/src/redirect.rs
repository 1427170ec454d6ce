use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use detour_core::{Action, Resolver};
use tower::{Service, ServiceExt};
use tracing::{debug, warn};

type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

/// Tower service that redirects mapped paths and forwards the rest.
///
/// On a miss the original request is passed to `fallback` exactly once and
/// its response is returned as-is.
#[derive(Debug, Clone)]
pub struct RedirectService<F> {
    resolver: Arc<Resolver>,
    fallback: F,
}

impl<F> RedirectService<F> {
    pub fn new(resolver: Arc<Resolver>, fallback: F) -> Self {
        Self { resolver, fallback }
    }
}

impl<F> Service<Request> for RedirectService<F>
where
    F: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    F::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = ResponseFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness of the fallback is awaited per call via `oneshot`.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        match self.resolver.resolve(request.uri().path()) {
            Action::Redirect { url, status } => {
                debug!(path = %request.uri().path(), url = %url, "redirecting");
                let response = redirect_response(url, status);
                Box::pin(async move { Ok(response) })
            }
            Action::Delegate => {
                let fallback = self.fallback.clone();
                Box::pin(fallback.oneshot(request))
            }
        }
    }
}

fn redirect_response(url: &str, status: u16) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::SEE_OTHER);

    match HeaderValue::try_from(url) {
        Ok(location) => (status, [(LOCATION, location)]).into_response(),
        Err(e) => {
            warn!(url = %url, error = %e, "redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
