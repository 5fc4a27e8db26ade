use std::path::Path;

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::kind::SourceKind;

/// Default directory used by listing and search.
pub const ROOT: &str = "/";

/// Blocking cloud source: every operation runs to completion on the calling thread.
///
/// Instances are not meant to be shared between threads; use one per thread.
pub trait BlockingSource: Send {
    /// Backend this source talks to.
    fn kind(&self) -> SourceKind;

    /// Credential the source was built with.
    fn token(&self) -> &str;

    /// Whether the last `connect` succeeded and `disconnect` has not been called since.
    fn is_connected(&self) -> bool;

    /// Validate the credential and mark the source connected.
    ///
    /// Returns `Ok(false)` when the backend cleanly reports the credential as
    /// invalid, `Authentication` when it rejects it as unauthorized and
    /// `Connection` for any other failure.
    fn connect(&mut self) -> SourceResult<bool>;

    /// Same token check as `connect` without touching the connected state.
    fn check_connection(&self) -> SourceResult<bool>;

    /// Paths of the immediate subdirectories of `path`, in backend order.
    fn list_directories(&self, path: &str) -> SourceResult<Vec<String>>;

    /// Like `list_directories`, keeping entries whose name contains `name`
    /// (case-insensitive). Only the immediate children of `path` are inspected.
    fn search_directories(&self, name: &str, path: &str) -> SourceResult<Vec<String>>;

    /// Download `remote_path` to `local_path`, creating missing local parents.
    fn download_file(&self, remote_path: &str, local_path: &Path) -> SourceResult<bool>;

    /// Upload `local_path` to `remote_path`, creating missing remote parents.
    fn upload_file(&self, local_path: &Path, remote_path: &str) -> SourceResult<bool>;

    /// Release the underlying client. Safe to call more than once.
    fn disconnect(&mut self) -> SourceResult<()>;
}

/// Cloud source whose operations suspend on I/O.
///
/// All methods take `&self`, so several operations may be in flight on one
/// instance at once; their completion order is unspecified.
#[async_trait]
pub trait Source: Send + Sync {
    /// Backend this source talks to.
    fn kind(&self) -> SourceKind;

    /// Credential the source was built with.
    fn token(&self) -> &str;

    /// Whether the last `connect` succeeded and `disconnect` has not been called since.
    fn is_connected(&self) -> bool;

    /// See [`BlockingSource::connect`].
    async fn connect(&self) -> SourceResult<bool>;

    /// See [`BlockingSource::check_connection`].
    async fn check_connection(&self) -> SourceResult<bool>;

    /// See [`BlockingSource::list_directories`].
    async fn list_directories(&self, path: &str) -> SourceResult<Vec<String>>;

    /// See [`BlockingSource::search_directories`].
    async fn search_directories(&self, name: &str, path: &str) -> SourceResult<Vec<String>>;

    /// See [`BlockingSource::download_file`].
    async fn download_file(&self, remote_path: &str, local_path: &Path) -> SourceResult<bool>;

    /// See [`BlockingSource::upload_file`].
    async fn upload_file(&self, local_path: &Path, remote_path: &str) -> SourceResult<bool>;

    /// See [`BlockingSource::disconnect`].
    async fn disconnect(&self) -> SourceResult<()>;
}
