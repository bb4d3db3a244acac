//! Sign-up, sign-in and profile handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::Response,
};
use tracing::instrument;

use stylish_core::{Role, Session, UserProfile};

use crate::envelope::{ApiResponse, session_response};
use crate::error::{AppError, Result, add_breadcrumb, set_sentry_user};
use crate::identity::{
    INVALID_AUTHORIZATION, SignInCredentials, bearer_token, parse_sign_in_body,
    parse_signup_body, validate_sign_in,
};
use crate::state::AppState;

/// Create a native account.
///
/// POST /api/1.0/user/signup
#[instrument(skip_all)]
pub async fn signup(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let form = parse_signup_body(&body)?;
    tracing::debug!(?form, "Sign-up requested");

    let session = state.users().signup(form, Role::User).await?;
    respond(&state, session)
}

/// Sign in with a supported provider.
///
/// POST /api/1.0/user/signin
#[instrument(skip_all, fields(provider = tracing::field::Empty))]
pub async fn signin(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let credentials = validate_sign_in(parse_sign_in_body(&body)?)?;

    let provider = credentials.provider();
    tracing::Span::current().record("provider", provider.as_str());
    add_breadcrumb("auth", "Sign-in dispatched", Some(&[("provider", provider.as_str())]));

    let users = state.users();
    let session = match credentials {
        SignInCredentials::Native { email, password } => {
            users.native_sign_in(&email, &password).await?
        }
        SignInCredentials::Facebook { access_token } => {
            users.facebook_sign_in(&access_token, Role::User).await?
        }
    };

    respond(&state, session)
}

/// Profile of the account behind a bearer token.
///
/// GET /api/1.0/user/profile
#[instrument(skip_all)]
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<UserProfile>> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Validation(INVALID_AUTHORIZATION.to_owned()))?;

    let profile = state.users().profile_from_token(token).await?;
    Ok(ApiResponse::new(profile))
}

fn respond(state: &AppState, session: Session) -> Result<Response> {
    set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
    tracing::info!(user_id = %session.user.id, provider = %session.user.provider, "Session issued");

    session_response(session, &state.config().cookie_path)
}
