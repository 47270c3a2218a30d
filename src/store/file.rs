//! Flat-file log store — the CSV file on disk.
//!
//! The file is created lazily with the header on the first append and only
//! ever grows. Writes use the platform's append mode; there is no locking
//! across concurrent writers.

use crate::store::csv::HEADER;
use crate::store::types::StoreError;
use crate::store::LogStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Default file name, relative to the working directory.
pub const DEFAULT_FILE_NAME: &str = "user_data.csv";

/// Append-only log backed by a single CSV file.
#[derive(Debug, Clone)]
pub struct FileLogStore {
    path: PathBuf,
}

impl FileLogStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header if it does not exist yet.
    /// `create_new` makes this a no-op when another request got there first.
    async fn ensure_header(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(mut file) => {
                file.write_all(format!("{HEADER}\n").as_bytes())
                    .await
                    .map_err(|e| StoreError::io(&self.path, e))?;
                file.flush()
                    .await
                    .map_err(|e| StoreError::io(&self.path, e))?;
                tracing::info!("Created visit log at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}

#[async_trait]
impl LogStore for FileLogStore {
    async fn append(&self, row: &str) -> Result<(), StoreError> {
        self.ensure_header().await?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(row.as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(bytes = row.len(), "Appended row to {}", self.path.display());
        Ok(())
    }

    async fn read_all(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}
