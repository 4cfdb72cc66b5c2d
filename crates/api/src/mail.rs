//! Outgoing email for account activation and password reset.
//!
//! Handlers talk to a [`Mailer`] held in application state. [`SmtpMailer`]
//! delivers through an SMTP relay with `lettre`; [`LogMailer`] only logs and
//! is used when `SMTP_HOST` is not configured.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{parse_or, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "Fig Tree <noreply@figtree.local>";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Returns `Ok(None)` when `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                              |
    /// |-----------------|----------|--------------------------------------|
    /// | `SMTP_HOST`     | yes      | --                                   |
    /// | `SMTP_PORT`     | no       | `587`                                |
    /// | `SMTP_FROM`     | no       | `Fig Tree <noreply@figtree.local>`   |
    /// | `SMTP_USER`     | no       | --                                   |
    /// | `SMTP_PASSWORD` | no       | --                                   |
    pub fn from_lookup(
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = lookup("SMTP_HOST").filter(|h| !h.is_empty()) else {
            return Ok(None);
        };
        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_or(lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
        }))
    }
}

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    pub fn activation(to: &str, username: &str, base_url: &str, token: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Activate your Fig Tree account".to_string(),
            body: format!(
                "Hello {username},\n\n\
                 Follow this link to activate your account:\n\n\
                 {base_url}/activate?token={token}\n"
            ),
        }
    }

    pub fn password_reset(to: &str, username: &str, base_url: &str, token: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Reset your Fig Tree password".to_string(),
            body: format!(
                "Hello {username},\n\n\
                 Someone asked to reset the password of your account. Follow this\n\
                 link to choose a new one:\n\n\
                 {base_url}/password-reset?token={token}\n\n\
                 If it was not you, ignore this email.\n"
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self {
            from: config.from_address.parse()?,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(mail.to.parse()?)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport.send(message).await?;
        tracing::info!(to = %mail.to, subject = %mail.subject, "Email sent");
        Ok(())
    }
}

/// Writes emails to the log instead of sending them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "Email not sent (no SMTP_HOST)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_mail_links_to_the_token() {
        let mail = OutgoingMail::activation("ada@example.com", "ada", "https://fig.example", "abc");
        assert_eq!(mail.to, "ada@example.com");
        assert!(mail.body.contains("https://fig.example/activate?token=abc"));
        assert!(mail.body.starts_with("Hello ada,"));
    }

    #[test]
    fn reset_mail_links_to_the_token() {
        let mail = OutgoingMail::password_reset("ada@example.com", "ada", "http://x", "t0k");
        assert!(mail.body.contains("http://x/password-reset?token=t0k"));
    }

    #[test]
    fn smtp_mailer_rejects_bad_sender() {
        let config = EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            from_address: "not an address".to_string(),
            smtp_user: None,
            smtp_password: None,
        };
        assert!(matches!(SmtpMailer::new(&config), Err(MailError::Address(_))));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mail = OutgoingMail::activation("a@b.c", "a", "http://x", "t");
        assert!(LogMailer.send(mail).await.is_ok());
    }
}
