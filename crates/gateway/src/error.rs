//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Client errors carry their message to
//! the caller; server faults are captured to Sentry and replaced with an
//! opaque detail. Every error body has the shape
//! `{ "status": 400, "title": "Bad Request", "detail": "..." }`.

use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::identity::SignInRejection;
use crate::services::{CatalogError, UserError};

const INTERNAL_DETAIL: &str = "Internal server error";
const INVALID_QUERY: &str = "Bad Request: invalid query string";
const INVALID_PATH: &str = "Bad Request: invalid path";

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed validation before any collaborator ran.
    #[error("Bad request: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User collaborator failed.
    #[error("User service: {0}")]
    User(#[from] UserError),

    /// Catalog collaborator failed.
    #[error("Catalog service: {0}")]
    Catalog(#[from] CatalogError),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SignInRejection> for AppError {
    fn from(rejection: SignInRejection) -> Self {
        Self::Validation(rejection.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Query string rejected");
        Self::Validation(INVALID_QUERY.to_owned())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            // route and extractor disagree on the captures
            return Self::Internal(rejection.body_text());
        }
        tracing::debug!(reason = %rejection.body_text(), "Path rejected");
        Self::Validation(INVALID_PATH.to_owned())
    }
}

/// Problem-style error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::User(UserError::Rejected(_)) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::User(_) | Self::Catalog(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the caller.
    fn detail(&self) -> String {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
            Self::User(UserError::Rejected(msg)) | Self::Catalog(CatalogError::NotFound(msg)) => {
                msg.clone()
            }
            Self::RateLimited => "Too many requests, please try again later".to_owned(),
            // Don't expose internal error details to clients
            Self::User(_) | Self::Catalog(_) | Self::Internal(_) => INTERNAL_DETAIL.to_owned(),
        }
    }

    /// Sentry tag separating sign-up notification faults from encoding faults.
    const fn fault_kind(&self) -> Option<&'static str> {
        match self {
            Self::User(UserError::Notification(_)) => Some("notification"),
            Self::User(UserError::Encoding(_)) => Some("encoding"),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::with_scope(
                |scope| {
                    if let Some(fault) = self.fault_kind() {
                        scope.set_tag("fault", fault);
                    }
                },
                || sentry::capture_error(&self),
            );
            tracing::error!(
                error = %self,
                fault = self.fault_kind().unwrap_or("unexpected"),
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_owned(),
            detail: self.detail(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
