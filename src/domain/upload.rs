//! Upload persistence boundary

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Where an upload ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Collision-free file name inside the upload directory
    pub stored_name: String,
    pub path: PathBuf,
}

/// Sink for uploaded images
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Persist the bytes; `declared_name` is client supplied and never used as a path
    async fn persist(&self, declared_name: &str, bytes: &[u8]) -> Result<StoredUpload, DomainError>;
}
