//! Mail notification of the most recent visit.
//!
//! `Notifier` reads the log through the `LogStore` trait and hands one
//! message to a `MailTransport`. Transports can be SMTP, disabled, or an
//! in-memory recorder.

pub mod local;
pub mod smtp;
pub mod types;

use crate::store::{csv, LogStore};
use async_trait::async_trait;
use std::sync::Arc;

pub use local::{DisabledTransport, RecordingTransport};
pub use smtp::{SmtpMailer, SmtpSettings};
pub use types::{Addresses, MailMessage, NotifyError, SUBJECT};

/// Trait for outbound mail.
/// A call is a single attempt; implementations must not retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), NotifyError>;
}

/// Emails the latest visit row to a fixed recipient.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn LogStore>,
    transport: Arc<dyn MailTransport>,
    addresses: Addresses,
}

impl Notifier {
    pub fn new(
        store: Arc<dyn LogStore>,
        transport: Arc<dyn MailTransport>,
        addresses: Addresses,
    ) -> Self {
        Self {
            store,
            transport,
            addresses,
        }
    }

    /// A notifier whose every send fails with `NotConfigured`.
    pub fn disabled(store: Arc<dyn LogStore>) -> Self {
        Self::new(store, Arc::new(DisabledTransport), Addresses::default())
    }

    /// Send the last data row of the log as the body of one email.
    /// Fails with `NoData` (and sends nothing) if there are no data rows.
    pub async fn notify_last(&self) -> Result<(), NotifyError> {
        let contents = self.store.read_all().await?.ok_or(NotifyError::NoData)?;
        let last = csv::last_record(&contents).ok_or(NotifyError::NoData)?;

        let message = MailMessage {
            from: self.addresses.from.clone(),
            to: self.addresses.to.clone(),
            subject: SUBJECT.to_string(),
            body: last.to_string(),
        };

        self.transport.send(&message).await?;
        tracing::info!(to = %message.to, "Sent latest visit notification");
        Ok(())
    }
}
