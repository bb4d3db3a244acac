//! `PostgreSQL` user collaborator.
//!
//! Handles native sign-up and sign-in with Argon2 password hashes, Facebook
//! sign-in through the Graph API, and resolving session tokens to profiles.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use sqlx::PgPool;

use stylish_core::{Email, Provider, Role, Session, SignupForm, UserProfile};

use super::email::{MailError, WelcomeMailer};
use super::facebook::{FacebookClient, FacebookError};
use super::token::SessionTokens;
use super::{UserError, UserService};
use crate::db::{NewUser, RepositoryError, UserRecord, UserRepository};

const EMAIL_EXISTS: &str = "Email Already Exists";
const SIGN_IN_FAILED: &str = "Sign In Failed";
const INVALID_FACEBOOK_TOKEN: &str = "Invalid Facebook Token";
const OTHER_PROVIDER: &str = "Account Registered With Another Provider";
const INVALID_TOKEN: &str = "Invalid Token";

/// Accounts stored in the `app_user` table.
#[derive(Clone)]
pub struct PgUserService {
    pool: PgPool,
    tokens: SessionTokens,
    facebook: FacebookClient,
    mailer: Arc<dyn WelcomeMailer>,
}

impl PgUserService {
    #[must_use]
    pub fn new(
        pool: PgPool,
        tokens: SessionTokens,
        facebook: FacebookClient,
        mailer: Arc<dyn WelcomeMailer>,
    ) -> Self {
        Self {
            pool,
            tokens,
            facebook,
            mailer,
        }
    }

    fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    /// Issue a session for a stored account.
    fn session_for(&self, user: &UserRecord) -> Result<Session, UserError> {
        let profile = user.profile();
        let access_token = self
            .tokens
            .issue(&profile)
            .map_err(|e| UserError::Unexpected(e.to_string()))?;

        Ok(Session {
            access_token,
            access_expired: self.tokens.lifetime_secs(),
            user: profile,
        })
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn signup(&self, form: SignupForm, role: Role) -> Result<Session, UserError> {
        let name = form.name.trim();
        if name.is_empty() || form.password.is_empty() {
            return Err(UserError::Rejected("name and password are required".to_owned()));
        }
        let email = Email::parse(&form.email).map_err(|e| UserError::Rejected(e.to_string()))?;

        if self.users().get_by_email(&email).await?.is_some() {
            return Err(UserError::Rejected(EMAIL_EXISTS.to_owned()));
        }

        let password_hash = hash_password(&form.password)?;
        let user = self
            .users()
            .create(&NewUser {
                provider: Provider::Native,
                role,
                name,
                email: &email,
                password_hash: Some(&password_hash),
                picture: None,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => UserError::Rejected(EMAIL_EXISTS.to_owned()),
                other => UserError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Native account created");

        let session = self.session_for(&user)?;
        self.mailer
            .send_welcome(&user.name, user.email.as_str())
            .await
            .map_err(mail_fault)?;

        Ok(session)
    }

    async fn native_sign_in(&self, email: &str, password: &str) -> Result<Session, UserError> {
        let rejected = || UserError::Rejected(SIGN_IN_FAILED.to_owned());

        let email = Email::parse(email).map_err(|_| rejected())?;
        let user = self.users().get_by_email(&email).await?.ok_or_else(rejected)?;

        if user.provider != Provider::Native {
            tracing::debug!(user_id = %user.id, provider = %user.provider, "Native sign-in on social account");
            return Err(rejected());
        }

        let hash = user.password_hash.as_deref().ok_or_else(rejected)?;
        if !verify_password(password, hash) {
            return Err(rejected());
        }

        self.session_for(&user)
    }

    async fn facebook_sign_in(
        &self,
        access_token: &str,
        role: Role,
    ) -> Result<Session, UserError> {
        let me = self.facebook.me(access_token).await.map_err(|e| match e {
            FacebookError::Rejected { .. } | FacebookError::MissingEmail => {
                UserError::Rejected(INVALID_FACEBOOK_TOKEN.to_owned())
            }
            other => UserError::Unexpected(other.to_string()),
        })?;

        let email = Email::parse(&me.email)
            .map_err(|_| UserError::Rejected(INVALID_FACEBOOK_TOKEN.to_owned()))?;

        let user = match self.users().get_by_email(&email).await? {
            Some(existing) if existing.provider != Provider::Facebook => {
                return Err(UserError::Rejected(OTHER_PROVIDER.to_owned()));
            }
            Some(existing) => {
                self.users()
                    .update_social_profile(existing.id, &me.name, me.picture.as_deref())
                    .await?
            }
            None => {
                let user = self
                    .users()
                    .create(&NewUser {
                        provider: Provider::Facebook,
                        role,
                        name: &me.name,
                        email: &email,
                        password_hash: None,
                        picture: me.picture.as_deref(),
                    })
                    .await?;
                tracing::info!(user_id = %user.id, facebook_id = %me.id, "Facebook account created");
                user
            }
        };

        self.session_for(&user)
    }

    async fn profile_from_token(&self, token: &str) -> Result<UserProfile, UserError> {
        let invalid = || UserError::Rejected(INVALID_TOKEN.to_owned());

        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            invalid()
        })?;
        let id = claims.user_id().map_err(|_| invalid())?;

        let user = self.users().get_by_id(id).await?.ok_or_else(invalid)?;
        Ok(user.profile())
    }
}

/// Sign-up mail faults: an address that cannot be encoded is distinct from a
/// relay that refused delivery.
fn mail_fault(err: MailError) -> UserError {
    match err {
        MailError::InvalidAddress(_) | MailError::MessageBuild(_) => {
            UserError::Encoding(err.to_string())
        }
        MailError::Smtp(_) => UserError::Notification(err.to_string()),
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::Unexpected(format!("password hash: {e}")))
}

/// Check a password against a stored PHC string.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
