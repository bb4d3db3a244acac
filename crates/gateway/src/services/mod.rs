//! Collaborators the gateway delegates to.
//!
//! Route handlers only see the [`CatalogService`] and [`UserService`] traits.
//! The default implementations are backed by `PostgreSQL`:
//!
//! - `catalog` - [`PgCatalogService`], product listings and lookups
//! - `users` - [`PgUserService`], sign-up, native and Facebook sign-in, profiles
//! - `token` - JWT session tokens issued to signed-in users
//! - `facebook` - Graph API client used to exchange Facebook access tokens
//! - `email` - welcome mail sent after sign-up

pub mod catalog;
pub mod email;
pub mod facebook;
pub mod token;
pub mod users;

use async_trait::async_trait;
use thiserror::Error;

use stylish_core::{Category, Product, ProductId, Role, Session, SignupForm, UserProfile};

use crate::db::RepositoryError;

pub use catalog::PgCatalogService;
pub use users::PgUserService;

/// Errors reported by a catalog collaborator.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product matches the requested criterion.
    #[error("{0}")]
    NotFound(String),

    /// Storage failure.
    #[error("catalog storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors reported by a user collaborator.
#[derive(Debug, Error)]
pub enum UserError {
    /// A business rule rejected the request (bad credentials, duplicate
    /// account, invalid token). The message is safe to show to the caller.
    #[error("{0}")]
    Rejected(String),

    /// The account was handled but the follow-up notification failed.
    #[error("notification failed: {0}")]
    Notification(String),

    /// A value could not be encoded for an outbound message.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Storage failure.
    #[error("user storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Any other failure inside the collaborator.
    #[error("user service failure: {0}")]
    Unexpected(String),
}

/// Product catalog.
///
/// Listing methods return up to one page plus at least one extra item so the
/// caller can tell whether another page exists without a count query.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Products of `category` starting at page `page_index`.
    async fn list_by_category(
        &self,
        category: Category,
        page_index: u32,
    ) -> Result<Vec<Product>, CatalogError>;

    /// Products whose title matches `keyword`, starting at page `page_index`.
    async fn search(&self, keyword: &str, page_index: u32) -> Result<Vec<Product>, CatalogError>;

    /// A single product.
    async fn get_by_id(&self, id: ProductId) -> Result<Product, CatalogError>;
}

/// Account and session management.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a native account and sign it in.
    async fn signup(&self, form: SignupForm, role: Role) -> Result<Session, UserError>;

    /// Verify an email/password pair.
    async fn native_sign_in(&self, email: &str, password: &str) -> Result<Session, UserError>;

    /// Exchange a Facebook access token for a session, creating the account
    /// on first use.
    async fn facebook_sign_in(&self, access_token: &str, role: Role)
    -> Result<Session, UserError>;

    /// Resolve a session token back to its account.
    async fn profile_from_token(&self, token: &str) -> Result<UserProfile, UserError>;
}
