//! STYLiSH gateway library.
//!
//! The public JSON API of the storefront: paged catalog listings and
//! multi-provider sign-in. Built as a library so the router can be driven in
//! tests with in-memory collaborators.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod listing;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    Router,
    http::{HeaderName, Method, Request, header},
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Build the full application router.
///
/// `rate_limited` enables the per-IP limiter on sign-in and sign-up. It keys
/// on the peer address (or trusted proxy headers), so serve the router with
/// `into_make_service_with_connect_info::<SocketAddr>()` when it is on.
pub fn app(state: AppState, rate_limited: bool) -> Router {
    let timeout = state.config().request_timeout;
    let trust_proxy_headers = state.config().trust_proxy_headers;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static("x-request-id")]);

    routes::routes(rate_limited, trust_proxy_headers)
        .fallback(not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_owned())
}
