//! Contact form relay
//!
//! Turns a public contact submission into one plain-text mail to the
//! configured recipient. Delivery is attempted once; a failure is reported
//! to the caller and not retried.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::{MailConfig, MailTransport};

/// Error types for the contact relay
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A form field was missing or blank; nothing was sent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The mail could not be built or delivered
    #[error("Delivery failed: {0}")]
    Delivery(#[from] anyhow::Error),
}

/// Submitted contact form. Fields are optional so a missing one can be
/// reported instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// A fully composed mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    fn to_message(&self) -> Result<Message> {
        Message::builder()
            .from(self.from.parse().map_err(|e| anyhow!("Invalid from address: {}", e))?)
            .reply_to(
                self.reply_to
                    .parse()
                    .map_err(|e| anyhow!("Invalid reply-to address: {}", e))?,
            )
            .to(self.to.parse().map_err(|e| anyhow!("Invalid to address: {}", e))?)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .map_err(|e| anyhow!("Failed to build email: {}", e))
    }
}

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Sends through an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        // Port 465 speaks TLS from the first byte, everything else upgrades
        let builder = if config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
        .port(config.smtp_port);

        let builder = if config.smtp_username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = mail.to_message()?;
        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;
        Ok(())
    }
}

/// Writes mail to the log instead of sending it
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        // Same address checks as a real delivery
        mail.to_message()?;
        tracing::info!(
            to = %mail.to,
            reply_to = %mail.reply_to,
            subject = %mail.subject,
            "Contact mail (log transport):\n{}",
            mail.body
        );
        Ok(())
    }
}

/// Build the mailer selected by configuration
pub fn create_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    match config.transport {
        MailTransport::Log => Ok(Arc::new(LogMailer)),
        MailTransport::Smtp => Ok(Arc::new(
            SmtpMailer::new(config).context("Failed to set up SMTP mailer")?,
        )),
    }
}

/// Composes and delivers contact mail
pub struct ContactRelay {
    mailer: Arc<dyn Mailer>,
    recipient: String,
    from: String,
    subject: String,
}

impl ContactRelay {
    pub fn new(mailer: Arc<dyn Mailer>, config: &MailConfig) -> Self {
        Self {
            mailer,
            recipient: config.contact_recipient.clone(),
            from: config.from_address.clone(),
            subject: config.subject.clone(),
        }
    }

    /// Compose the mail for a submission
    pub fn compose(&self, name: &str, email: &str, message: &str) -> OutgoingMail {
        OutgoingMail {
            from: self.from.clone(),
            to: self.recipient.clone(),
            reply_to: email.to_string(),
            subject: self.subject.clone(),
            body: format!("Name: {}\nEmail: {}\nMessage:\n{}", name, email, message),
        }
    }

    /// Check the submission and deliver it
    pub async fn relay(&self, form: &ContactForm) -> Result<(), RelayError> {
        let name = required(&form.name, "name")?;
        let email = required(&form.email, "email")?;
        let message = required(&form.message, "message")?;

        let mail = self.compose(name, email, message);
        match self.mailer.send(&mail).await {
            Ok(()) => {
                tracing::info!("Relayed contact message from {}", email);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Contact relay failed: {:#}", e);
                Err(RelayError::Delivery(e))
            }
        }
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, RelayError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RelayError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<()> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _mail: &OutgoingMail) -> Result<()> {
            Err(anyhow!("connection refused"))
        }
    }

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn test_relay_composes_mail() {
        let mailer = Arc::new(RecordingMailer::default());
        let relay = ContactRelay::new(mailer.clone(), &MailConfig::default());

        relay
            .relay(&form("Dilnoza", "dilnoza@example.com", "Salom!\nQabul qachon?"))
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let mail = &sent[0];
        assert_eq!(mail.to, MailConfig::default().contact_recipient);
        assert_eq!(mail.reply_to, "dilnoza@example.com");
        assert_eq!(
            mail.body,
            "Name: Dilnoza\nEmail: dilnoza@example.com\nMessage:\nSalom!\nQabul qachon?"
        );
    }

    #[tokio::test]
    async fn test_missing_field_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::default());
        let relay = ContactRelay::new(mailer.clone(), &MailConfig::default());

        let mut incomplete = form("A", "a@example.com", "hi");
        incomplete.message = None;
        let err = relay.relay(&incomplete).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingField("message")));

        let err = relay.relay(&form("  ", "a@example.com", "hi")).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingField("name")));

        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported() {
        let relay = ContactRelay::new(Arc::new(FailingMailer), &MailConfig::default());
        let err = relay.relay(&form("A", "a@example.com", "hi")).await.unwrap_err();
        assert!(matches!(err, RelayError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_log_mailer_rejects_bad_reply_to() {
        let relay = ContactRelay::new(Arc::new(LogMailer), &MailConfig::default());

        assert!(relay.relay(&form("A", "a@example.com", "hi")).await.is_ok());
        let err = relay.relay(&form("A", "not an address", "hi")).await.unwrap_err();
        assert!(matches!(err, RelayError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_create_mailer_defaults_to_log() {
        let mailer = create_mailer(&MailConfig::default()).unwrap();
        let relay = ContactRelay::new(mailer, &MailConfig::default());
        assert!(relay.relay(&form("A", "a@example.com", "hi")).await.is_ok());
    }
}
