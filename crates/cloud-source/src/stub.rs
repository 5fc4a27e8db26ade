//! Sources for backends that are known but not implemented yet.
//!
//! They can be constructed like any other source; every operation fails with
//! [`SourceError::NotImplemented`].

use std::path::Path;

use async_trait::async_trait;
use cloud_source_core::{BlockingSource, Source, SourceError, SourceKind, SourceResult};

macro_rules! unimplemented_source {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            token: String,
        }

        impl $name {
            pub fn new(token: impl Into<String>) -> Self {
                Self {
                    token: token.into(),
                }
            }

            fn unavailable<T>(&self) -> SourceResult<T> {
                tracing::debug!("{} operation requested", $kind);
                Err(SourceError::NotImplemented($kind))
            }
        }

        impl BlockingSource for $name {
            fn kind(&self) -> SourceKind {
                $kind
            }

            fn token(&self) -> &str {
                &self.token
            }

            fn is_connected(&self) -> bool {
                false
            }

            fn connect(&mut self) -> SourceResult<bool> {
                self.unavailable()
            }

            fn check_connection(&self) -> SourceResult<bool> {
                self.unavailable()
            }

            fn list_directories(&self, _path: &str) -> SourceResult<Vec<String>> {
                self.unavailable()
            }

            fn search_directories(&self, _name: &str, _path: &str) -> SourceResult<Vec<String>> {
                self.unavailable()
            }

            fn download_file(&self, _remote_path: &str, _local_path: &Path) -> SourceResult<bool> {
                self.unavailable()
            }

            fn upload_file(&self, _local_path: &Path, _remote_path: &str) -> SourceResult<bool> {
                self.unavailable()
            }

            fn disconnect(&mut self) -> SourceResult<()> {
                self.unavailable()
            }
        }

        #[async_trait]
        impl Source for $name {
            fn kind(&self) -> SourceKind {
                $kind
            }

            fn token(&self) -> &str {
                &self.token
            }

            fn is_connected(&self) -> bool {
                false
            }

            async fn connect(&self) -> SourceResult<bool> {
                self.unavailable()
            }

            async fn check_connection(&self) -> SourceResult<bool> {
                self.unavailable()
            }

            async fn list_directories(&self, _path: &str) -> SourceResult<Vec<String>> {
                self.unavailable()
            }

            async fn search_directories(
                &self,
                _name: &str,
                _path: &str,
            ) -> SourceResult<Vec<String>> {
                self.unavailable()
            }

            async fn download_file(
                &self,
                _remote_path: &str,
                _local_path: &Path,
            ) -> SourceResult<bool> {
                self.unavailable()
            }

            async fn upload_file(
                &self,
                _local_path: &Path,
                _remote_path: &str,
            ) -> SourceResult<bool> {
                self.unavailable()
            }

            async fn disconnect(&self) -> SourceResult<()> {
                self.unavailable()
            }
        }
    };
}

unimplemented_source!(
    /// Google Drive source (not implemented yet).
    GoogleDriveSource,
    SourceKind::GoogleDrive
);

unimplemented_source!(
    /// S3 source (not implemented yet).
    S3Source,
    SourceKind::S3
);
