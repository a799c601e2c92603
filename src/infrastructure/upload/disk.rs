//! Uploads written to a local directory under collision-free names

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::upload::{StoredUpload, UploadSink};
use crate::domain::DomainError;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct DiskUploadSink {
    directory: PathBuf,
}

impl DiskUploadSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_directory(&self) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create upload directory {}: {}",
                self.directory.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl UploadSink for DiskUploadSink {
    async fn persist(&self, declared_name: &str, bytes: &[u8]) -> Result<StoredUpload, DomainError> {
        self.ensure_directory().await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(declared_name));
        let path = self.directory.join(&stored_name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create upload file: {}", e)))?;

        write_or_discard(file, &path, bytes).await?;

        debug!(stored_name = %stored_name, size = bytes.len(), "Upload persisted");

        Ok(StoredUpload { stored_name, path })
    }
}

/// Write the whole upload; a partial file is removed so it is never served
async fn write_or_discard<W>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<(), DomainError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;

    let Err(e) = written else {
        return Ok(());
    };

    drop(writer);
    if let Err(remove_err) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %remove_err, "Failed to remove partial upload");
    }

    Err(DomainError::storage(format!("Failed to write upload: {}", e)))
}

/// Reduce a client-declared file name to a safe final path component
pub fn sanitize_filename(declared: &str) -> String {
    let base = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed: String = cleaned
        .trim_start_matches('.')
        .chars()
        .take(MAX_NAME_LEN)
        .collect();

    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed
    }
}
