//! In-memory log store with the same contract as the CSV file.

use crate::store::csv::HEADER;
use crate::store::types::StoreError;
use crate::store::LogStore;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Holds the log text in memory. `None` means "never created".
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    contents: Mutex<Option<String>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing log text (header included if wanted).
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, row: &str) -> Result<(), StoreError> {
        let mut contents = self.contents.lock().await;
        contents
            .get_or_insert_with(|| format!("{HEADER}\n"))
            .push_str(row);
        Ok(())
    }

    async fn read_all(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents.lock().await.clone())
    }
}
