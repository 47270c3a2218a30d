pub mod csv;
pub mod file;
pub mod memory;
pub mod types;

use async_trait::async_trait;

pub use file::FileLogStore;
pub use memory::MemoryLogStore;
pub use types::{Record, StoreError};

/// Append-only visit log.
/// Handlers only see this trait, so the flat file can be swapped for an
/// in-memory log in tests.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append a pre-formatted row verbatim, creating the log (with its
    /// header) if needed.
    async fn append(&self, row: &str) -> Result<(), StoreError>;

    /// Full raw contents, or `None` if the log has never been created.
    async fn read_all(&self) -> Result<Option<String>, StoreError>;

    /// Format a record as a CSV row and append it.
    async fn append_record(&self, record: &Record) -> Result<(), StoreError> {
        self.append(&csv::format_row(record)).await
    }

    /// Number of data rows. A missing log counts as zero.
    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self
            .read_all()
            .await?
            .map(|contents| csv::count_records(&contents))
            .unwrap_or(0))
    }
}
