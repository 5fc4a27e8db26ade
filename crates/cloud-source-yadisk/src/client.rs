//! Operations the Yandex Disk sources need from an underlying client.
//!
//! [`crate::YadiskClient`] and [`crate::BlockingYadiskClient`] implement these
//! against the REST API; tests plug in in-memory doubles.

use std::path::Path;

use async_trait::async_trait;
use cloud_source_core::DirectoryEntry;

use crate::error::ClientError;

/// Client whose calls suspend on I/O. One handle may serve concurrent calls.
#[async_trait]
pub trait DiskClient: Send + Sync {
    /// `Ok(false)` when the token is trivially invalid, `Unauthorized` when the API rejects it.
    async fn check_token(&self) -> Result<bool, ClientError>;

    /// Immediate children of `path`, in API order.
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, ClientError>;

    async fn exists(&self, path: &str) -> Result<bool, ClientError>;

    /// Create a single directory; its parent must exist.
    async fn mkdir(&self, path: &str) -> Result<(), ClientError>;

    async fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), ClientError>;

    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<(), ClientError>;

    async fn close(&self) -> Result<(), ClientError>;
}

/// Client whose calls block the calling thread.
pub trait BlockingDiskClient: Send {
    fn check_token(&self) -> Result<bool, ClientError>;

    fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, ClientError>;

    fn exists(&self, path: &str) -> Result<bool, ClientError>;

    fn mkdir(&self, path: &str) -> Result<(), ClientError>;

    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), ClientError>;

    fn upload(&self, local_path: &Path, remote_path: &str) -> Result<(), ClientError>;

    fn close(&self) -> Result<(), ClientError>;
}
