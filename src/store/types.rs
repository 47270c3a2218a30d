//! Types for the visit log.
//!
//! A visit is one row in the CSV file: when it happened, which browser
//! reported it, and the public IP the browser resolved for itself.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single visitor-tracking entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// When the visit was recorded
    pub timestamp: DateTime<Utc>,

    /// Raw `User-Agent` header (may contain commas and quotes)
    pub user_agent: String,

    /// IP literal as reported by the client
    pub ip: String,
}

impl Record {
    /// Build a record stamped with the current time.
    pub fn now(user_agent: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            user_agent: user_agent.into(),
            ip: ip.into(),
        }
    }

    /// Timestamp in the `toISOString` shape: UTC, milliseconds, `Z` suffix.
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Errors raised by a log store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
