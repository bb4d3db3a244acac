//! HTTP route handlers for the gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (database)
//!
//! # Products
//! GET  /api/1.0/products/{category}?paging=N        - Category listing
//! GET  /api/1.0/products/search?keyword=S&paging=N  - Title search
//! GET  /api/1.0/products/details?id=N               - Single product
//!
//! # User
//! POST /api/1.0/user/signup                 - Native sign-up (rate limited)
//! POST /api/1.0/user/signin                 - Native or Facebook sign-in (rate limited)
//! GET  /api/1.0/user/profile                - Profile from bearer token
//! ```

pub mod health;
pub mod products;
pub mod user;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, rate_limit_body_middleware};
use crate::state::AppState;

/// Prefix shared by every API route.
pub const API_PREFIX: &str = "/api/1.0";

/// Create the product routes router.
///
/// The literal `details` and `search` segments take precedence over the
/// `{category}` capture.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/details", get(products::details))
        .route("/search", get(products::search))
        .route("/{category}", get(products::list_by_category))
}

/// Create the user routes router.
///
/// Sign-up and sign-in get the per-IP limiter when `rate_limited` is set.
pub fn user_routes(rate_limited: bool, trust_proxy_headers: bool) -> Router<AppState> {
    let credentials = Router::new()
        .route("/signup", post(user::signup))
        .route("/signin", post(user::signin));

    let credentials = if rate_limited {
        credentials
            .layer(auth_rate_limiter(trust_proxy_headers))
            .layer(axum::middleware::from_fn(rate_limit_body_middleware))
    } else {
        credentials
    };

    credentials.route("/profile", get(user::profile))
}

/// Create all routes for the gateway.
pub fn routes(rate_limited: bool, trust_proxy_headers: bool) -> Router<AppState> {
    let api = Router::new()
        .nest("/products", product_routes())
        .nest("/user", user_routes(rate_limited, trust_proxy_headers));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest(API_PREFIX, api)
}
