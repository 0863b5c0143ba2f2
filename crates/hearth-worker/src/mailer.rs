//! Staff email delivery over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;

use hearth_core::Config;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Email transport is not configured")]
    NotConfigured,

    #[error("Email rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build from config. Returns `Ok(None)` when email notifications are disabled.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        if !config.email_notifications_enabled() {
            tracing::debug!("Email notifications disabled (EMAIL_NOTIFICATIONS_ENABLED=false)");
            return Ok(None);
        }
        let host = config
            .smtp_host()
            .ok_or_else(|| anyhow::anyhow!("SMTP_HOST is required when email notifications are enabled"))?;
        let from: Mailbox = config
            .smtp_from()
            .ok_or_else(|| anyhow::anyhow!("SMTP_FROM is required when email notifications are enabled"))?
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SMTP_FROM: {}", e))?;
        let port = config.smtp_port().unwrap_or(587);

        let builder = if config.smtp_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let builder = builder.port(port);
        let builder = match (config.smtp_user(), config.smtp_password()) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.to_string(), password.to_string()))
            }
            _ => builder,
        };

        tracing::info!(
            host = %host,
            port = port,
            starttls = config.smtp_tls(),
            "SMTP mailer initialized"
        );

        Ok(Some(Self {
            transport: builder.build(),
            from,
        }))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let to: Mailbox = email.to.parse()?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Staff email sent");
        Ok(())
    }
}

/// In-process mailer that keeps every delivered message. It can be told to
/// reject the first `n` attempts.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failures_left: AtomicUsize,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(times: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures_left: AtomicUsize::new(times),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let rejected = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(DeliveryError::Rejected("mailbox unavailable".to_string()));
        }
        self.sent
            .lock()
            .map_err(|_| DeliveryError::Rejected("mailer poisoned".to_string()))?
            .push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "staff@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_recording_mailer_fails_then_records() {
        let mailer = RecordingMailer::failing(1);
        assert!(matches!(
            mailer.send(&email()).await,
            Err(DeliveryError::Rejected(_))
        ));
        mailer.send(&email()).await.unwrap();
        assert_eq!(mailer.sent(), vec![email()]);
    }
}
