//! Blockshop Storefront library.
//!
//! Server-rendered storefront: a catalog grid, a per-visitor cart kept in an
//! in-memory session, and toast notifications. The router is built here so
//! that the binary and the integration tests serve exactly the same app.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::body::Body;
use axum::http::Request;
use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are not included; the binary adds them outermost.
pub fn app(state: AppState) -> Router {
    let session_layer =
        middleware::create_session_layer(state.config(), state.session_store().clone());
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Span for one HTTP request. `request_id` is filled in by the request ID
/// middleware.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. There are no dependencies to check.
async fn health() -> &'static str {
    "ok"
}
