//! Facebook Graph API client.
//!
//! Resolves a user access token obtained by the browser's Facebook login into
//! the profile fields the storefront stores.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Fields requested from `/me`.
const PROFILE_FIELDS: &str = "id,name,email,picture.type(large)";

/// Errors that can occur when calling the Graph API.
#[derive(Debug, Error)]
pub enum FacebookError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Graph API refused the token.
    #[error("Graph API error: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// The profile lacks an email, so it cannot be matched to an account.
    #[error("Facebook profile has no email permission")]
    MissingEmail,

    /// Misconfigured base URL.
    #[error("invalid Graph API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Profile returned by `/me`.
#[derive(Debug, Clone)]
pub struct FacebookProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
struct MeResponse {
    id: String,
    name: String,
    email: Option<String>,
    picture: Option<PictureEnvelope>,
}

#[derive(Deserialize)]
struct PictureEnvelope {
    data: PictureData,
}

#[derive(Deserialize)]
struct PictureData {
    url: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Deserialize)]
struct GraphErrorBody {
    message: String,
}

/// Graph API client.
#[derive(Clone)]
pub struct FacebookClient {
    client: reqwest::Client,
    me_url: Url,
}

impl FacebookClient {
    /// Create a client against `graph_url` (normally `https://graph.facebook.com`).
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the HTTP client fails to build.
    pub fn new(graph_url: &str) -> Result<Self, FacebookError> {
        let me_url = Url::parse(&format!("{}/me", graph_url.trim_end_matches('/')))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, me_url })
    }

    /// Look up the profile behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns `FacebookError::Rejected` when the Graph API refuses the token,
    /// `FacebookError::MissingEmail` when the user withheld their email, or
    /// `FacebookError::Http` on transport failure.
    pub async fn me(&self, access_token: &str) -> Result<FacebookProfile, FacebookError> {
        let mut url = self.me_url.clone();
        url.query_pairs_mut()
            .append_pair("fields", PROFILE_FIELDS)
            .append_pair("access_token", access_token);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map_or_else(|_| status.to_string(), |body| body.error.message);
            tracing::debug!(status = status.as_u16(), %message, "Graph API rejected token");
            return Err(FacebookError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let me: MeResponse = response.json().await?;
        let email = me.email.ok_or(FacebookError::MissingEmail)?;

        Ok(FacebookProfile {
            id: me.id,
            name: me.name,
            email,
            picture: me.picture.map(|p| p.data.url),
        })
    }
}
