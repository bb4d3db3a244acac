//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STYLISH_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STYLISH_JWT_SECRET` - HS256 signing secret for session tokens (min 32 chars, high entropy)
//!
//! ## Optional
//! - `STYLISH_HOST` - Bind address (default: 127.0.0.1)
//! - `STYLISH_PORT` - Listen port (default: 3000)
//! - `STYLISH_PAGING_SIZE` - Products per listing page (default: 6)
//! - `STYLISH_JWT_LIFETIME_SECS` - Session token lifetime (default: 3600)
//! - `STYLISH_COOKIE_PATH` - Path the session cookie is scoped to (default: /admin/)
//! - `STYLISH_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `STYLISH_TRUST_PROXY_HEADERS` - Key the credential rate limiter on
//!   `cf-connecting-ip` / `x-real-ip` / `x-forwarded-for` (default: false). Only
//!   enable behind a proxy that overwrites these headers.
//! - `FACEBOOK_GRAPH_URL` - Graph API base URL (default: <https://graph.facebook.com>)
//! - `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM` - Welcome mail relay;
//!   all four must be set to enable SMTP delivery
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Sentry error tracking

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as a copy-pasted placeholder (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Gateway application configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Maximum number of products per listing page
    pub paging_size: usize,
    /// Session token settings
    pub jwt: JwtConfig,
    /// Path attribute of the `access-token` cookie
    pub cookie_path: String,
    /// Upper bound on handling a single request
    pub request_timeout: Duration,
    /// Trust client-IP headers set by a fronting proxy
    pub trust_proxy_headers: bool,
    /// Facebook Graph API base URL
    pub facebook_graph_url: String,
    /// Welcome mail relay, if configured
    pub smtp: Option<SmtpConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Session token signing configuration.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub lifetime_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

/// SMTP relay used for the welcome mail sent after sign-up.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the JWT secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let paging_size: usize = parse_env_or("STYLISH_PAGING_SIZE", 6)?;
        if paging_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STYLISH_PAGING_SIZE".to_owned(),
                "must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            database_url: get_database_url("STYLISH_DATABASE_URL")?,
            host: parse_env_or("STYLISH_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_env_or("STYLISH_PORT", 3000)?,
            paging_size,
            jwt: JwtConfig {
                secret: get_jwt_secret("STYLISH_JWT_SECRET")?,
                lifetime_secs: parse_env_or("STYLISH_JWT_LIFETIME_SECS", 3600)?,
            },
            cookie_path: get_env_or_default("STYLISH_COOKIE_PATH", "/admin/"),
            request_timeout: Duration::from_secs(parse_env_or(
                "STYLISH_REQUEST_TIMEOUT_SECS",
                30,
            )?),
            trust_proxy_headers: parse_env_or("STYLISH_TRUST_PROXY_HEADERS", false)?,
            facebook_graph_url: get_env_or_default(
                "FACEBOOK_GRAPH_URL",
                "https://graph.facebook.com",
            ),
            smtp: SmtpConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SmtpConfig {
    /// SMTP is all-or-nothing: a partial configuration disables mail delivery.
    fn from_env() -> Option<Self> {
        Some(Self {
            host: get_optional_env("SMTP_HOST")?,
            username: get_optional_env("SMTP_USERNAME")?,
            password: SecretString::from(get_optional_env("SMTP_PASSWORD")?),
            from: get_optional_env("SMTP_FROM")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_owned())
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
    })
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_owned()))
}

fn get_jwt_secret(key: &str) -> Result<SecretString, ConfigError> {
    let secret = SecretString::from(get_required_env(key)?);
    validate_jwt_secret(&secret, key)?;
    Ok(secret)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, u32> = HashMap::new();
    let mut total = 0_u32;
    for c in s.chars() {
        *freq.entry(c).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    freq.values()
        .map(|&count| {
            let p = f64::from(count) / total;
            -p * p.log2()
        })
        .sum()
}

/// Reject short, placeholder-looking, or low-entropy signing secrets.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    let insecure = |reason: String| ConfigError::InsecureSecret(var_name.to_owned(), reason);

    if value.chars().count() < MIN_JWT_SECRET_LENGTH {
        return Err(insecure(format!(
            "must be at least {MIN_JWT_SECRET_LENGTH} characters"
        )));
    }

    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(insecure(format!(
            "appears to be a placeholder (contains '{pattern}')"
        )));
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        )));
    }

    Ok(())
}
