//! Transports that never touch the network.

use crate::notify::types::{MailMessage, NotifyError};
use crate::notify::MailTransport;
use async_trait::async_trait;
use std::sync::Mutex;

/// Used when SMTP settings are incomplete. Every send fails.
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, _message: &MailMessage) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}

/// Keeps every message it is asked to send (for testing).
/// Built with `failing`, it records the attempt and then errors.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<MailMessage>>,
    attempts: Mutex<usize>,
    failure: Option<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Send calls so far, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|a| *a).unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), NotifyError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts += 1;
        }
        if let Some(ref reason) = self.failure {
            return Err(NotifyError::Transport(reason.clone()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}
