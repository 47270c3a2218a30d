//! Types for the mail notification flow.

use crate::store::StoreError;

/// Subject line of every notification.
pub const SUBJECT: &str = "Most Recent User Data Entry Logged";

/// A plain-text email, independent of the transport that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sender and recipient for notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Addresses {
    pub from: String,
    pub to: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The log is missing or holds only its header.
    #[error("no visit entries to send")]
    NoData,

    #[error("mail transport is not configured")]
    NotConfigured,

    #[error("failed to read visit log: {0}")]
    Store(#[from] StoreError),

    #[error("invalid email: {0}")]
    Message(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}
