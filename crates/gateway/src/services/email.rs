//! Welcome mail sent after a native sign-up.
//!
//! Uses SMTP via lettre when a relay is configured. Without one, the
//! [`LogMailer`] records the event and delivers nothing.

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpConfig;

/// Errors that can occur when sending mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// A sender or recipient could not be encoded as a mailbox.
    #[error("invalid mailbox: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),
}

/// Something that can greet a newly registered user.
#[async_trait]
pub trait WelcomeMailer: Send + Sync {
    /// Send the welcome message to `email`, addressed to `name`.
    async fn send_welcome(&self, name: &str, email: &str) -> Result<(), MailError>;
}

/// SMTP-backed mailer.
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the relay host is invalid or the sender address
    /// cannot be parsed.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .credentials(credentials)
            .build();

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from.clone()))?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl WelcomeMailer for SmtpMailer {
    async fn send_welcome(&self, name: &str, email: &str) -> Result<(), MailError> {
        let message = welcome_message(self.from.clone(), name, email)?;
        self.mailer.send(message).await?;

        tracing::info!(to = %email, "Welcome mail sent");
        Ok(())
    }
}

/// Mailer used when no SMTP relay is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl WelcomeMailer for LogMailer {
    async fn send_welcome(&self, name: &str, email: &str) -> Result<(), MailError> {
        tracing::info!(to = %email, %name, "SMTP not configured, skipping welcome mail");
        Ok(())
    }
}

fn welcome_message(from: Mailbox, name: &str, email: &str) -> Result<Message, MailError> {
    let address: Address = email
        .parse()
        .map_err(|_| MailError::InvalidAddress(email.to_owned()))?;
    let to = Mailbox::new(Some(name.to_owned()), address);

    let body = format!(
        "Hi {name},\n\n\
         Welcome to STYLiSH! Your account is ready, so start browsing the latest \
         collections whenever you like.\n\n\
         The STYLiSH team\n"
    );

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject("Welcome to STYLiSH")
        .header(ContentType::TEXT_PLAIN)
        .body(body)?)
}
