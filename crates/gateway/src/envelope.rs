//! Response envelopes and the session cookie.

use axum::{
    Json,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use stylish_core::Session;

use crate::error::AppError;
use crate::listing::Page;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "access-token";

/// Success body: `{ "data": ..., "next_page": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}

impl<T> ApiResponse<T> {
    pub const fn new(data: T) -> Self {
        Self {
            data,
            next_page: None,
        }
    }
}

impl<T> From<Page<T>> for ApiResponse<Vec<T>> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            next_page: page.next_page,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// RFC 6265 `cookie-octet`: visible ASCII minus `"`, `,`, `;` and `\`.
const fn is_cookie_octet(byte: u8) -> bool {
    matches!(byte, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// `Set-Cookie` value for a session, or `None` when it carries no token.
///
/// The cookie is `HttpOnly`, scoped to `path`, and has no expiry.
///
/// # Errors
///
/// Returns `AppError::Internal` if a non-empty token holds bytes a cookie
/// value cannot carry. The token is never escaped or dropped.
pub fn session_cookie(session: &Session, path: &str) -> Result<Option<HeaderValue>, AppError> {
    if !session.has_token() {
        return Ok(None);
    }
    if !session.access_token.bytes().all(is_cookie_octet) {
        return Err(AppError::Internal(
            "session token is not a valid cookie value".to_owned(),
        ));
    }

    let value = format!("{SESSION_COOKIE}={}; HttpOnly; Path={path}", session.access_token);
    HeaderValue::from_str(&value)
        .map(Some)
        .map_err(|e| AppError::Internal(format!("session cookie header: {e}")))
}

/// `{ data: Session }` plus the session cookie when one applies.
///
/// # Errors
///
/// Fails when the token cannot be carried in the cookie; see [`session_cookie`].
pub fn session_response(session: Session, cookie_path: &str) -> Result<Response, AppError> {
    let cookie = session_cookie(&session, cookie_path)?;
    let mut response = ApiResponse::new(session).into_response();

    if let Some(cookie) = cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}
