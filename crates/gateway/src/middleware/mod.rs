//! HTTP middleware stack for the gateway.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layer (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (JSON API hardening)
//! 5. Timeout
//! 6. Rate limiting on sign-in and sign-up (governor)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::{auth_rate_limiter, rate_limit_body_middleware};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
