//! SMTP transport built on lettre.
//!
//! `secure` means implicit TLS from the first byte (usually port 465).
//! Otherwise the connection starts in plain text and upgrades with STARTTLS
//! when the server offers it.

use crate::notify::types::{MailMessage, NotifyError};
use crate::notify::MailTransport;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Connection settings for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    /// Username and password, when the relay requires auth
    pub credentials: Option<(String, String)>,
}

/// Sends notifications through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| NotifyError::Transport(e.to_string()))?
        } else {
            let tls = TlsParameters::new(settings.host.clone())
                .map_err(|e| NotifyError::Transport(e.to_string()))?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .tls(Tls::Opportunistic(tls))
        };

        let mut builder = builder.port(settings.port);
        if let Some((user, pass)) = &settings.credentials {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            host: settings.host.clone(),
        })
    }
}

/// Convert a transport-neutral message into a lettre `Message`.
pub fn build_email(message: &MailMessage) -> Result<Message, NotifyError> {
    let from: Mailbox = message
        .from
        .parse()
        .map_err(|e| NotifyError::Message(format!("sender {:?}: {}", message.from, e)))?;
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| NotifyError::Message(format!("recipient {:?}: {}", message.to, e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| NotifyError::Message(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), NotifyError> {
        let email = build_email(message)?;
        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        tracing::debug!(
            host = %self.host,
            code = %response.code(),
            "SMTP relay accepted message"
        );
        Ok(())
    }
}
