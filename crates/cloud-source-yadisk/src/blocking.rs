//! Yandex Disk [`BlockingSource`] implementation.

use std::path::Path;

use cloud_source_core::path::parent_dir;
use cloud_source_core::{
    directory_paths, matching_directory_paths, BlockingSource, DirectoryEntry, SourceError,
    SourceKind, SourceResult,
};
use tracing::{debug, info, instrument, warn};

use crate::blocking_api::BlockingYadiskClient;
use crate::client::BlockingDiskClient;
use crate::error::ClientError;

const KIND: SourceKind = SourceKind::YandexDisk;

/// Yandex Disk source running every operation on the calling thread.
pub struct BlockingYadiskSource<C = BlockingYadiskClient> {
    token: String,
    client: Option<C>,
    connected: bool,
}

impl BlockingYadiskSource<BlockingYadiskClient> {
    /// Source backed by the REST API.
    ///
    /// Construction is safe anywhere; the HTTP client is built on the first
    /// request.
    ///
    /// # Panics
    ///
    /// Operations that reach the network panic when called from inside an
    /// async runtime. Use `tokio::task::spawn_blocking` there.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let client = BlockingYadiskClient::new(token.clone());
        Self::with_client(token, client)
    }
}

impl<C: BlockingDiskClient> BlockingYadiskSource<C> {
    pub fn with_client(token: impl Into<String>, client: C) -> Self {
        Self {
            token: token.into(),
            client: Some(client),
            connected: false,
        }
    }

    fn client(&self) -> SourceResult<&C> {
        self.client.as_ref().ok_or(SourceError::Disconnected(KIND))
    }

    fn connected_client(&self) -> SourceResult<&C> {
        let client = self.client()?;
        if !self.connected {
            return Err(SourceError::connection(
                "Not connected to Yandex Disk; call connect() first",
            ));
        }
        Ok(client)
    }

    fn entries(&self, path: &str) -> SourceResult<Vec<DirectoryEntry>> {
        self.connected_client()?.list_directory(path).map_err(|e| {
            SourceError::connection_caused_by(format!("Failed to list directory {}", path), e)
        })
    }
}

/// Blocking counterpart of the suspending source's directory ensure.
fn ensure_remote_dir<C: BlockingDiskClient>(client: &C, path: &str) -> Result<(), ClientError> {
    if client.exists(path)? {
        return Ok(());
    }

    if let Some(parent) = parent_dir(path) {
        ensure_remote_dir(client, parent)?;
    }

    match client.mkdir(path) {
        Ok(()) => {
            debug!("Created remote directory {}", path);
            Ok(())
        }
        Err(ClientError::AlreadyExists(_)) => {
            warn!("Remote directory {} was created concurrently", path);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

impl<C: BlockingDiskClient> BlockingSource for BlockingYadiskSource<C> {
    fn kind(&self) -> SourceKind {
        KIND
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    #[instrument(skip(self), level = "debug")]
    fn connect(&mut self) -> SourceResult<bool> {
        if !self.check_connection()? {
            warn!("Yandex Disk rejected the token");
            return Ok(false);
        }

        self.connected = true;
        info!("Connected to Yandex Disk");
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    fn check_connection(&self) -> SourceResult<bool> {
        self.client()?
            .check_token()
            .map_err(ClientError::into_token_error)
    }

    #[instrument(skip(self), level = "debug")]
    fn list_directories(&self, path: &str) -> SourceResult<Vec<String>> {
        let dirs = directory_paths(self.entries(path)?);
        debug!("Found {} directories in {}", dirs.len(), path);
        Ok(dirs)
    }

    #[instrument(skip(self), level = "debug")]
    fn search_directories(&self, name: &str, path: &str) -> SourceResult<Vec<String>> {
        let dirs = matching_directory_paths(self.entries(path)?, name);
        debug!("Found {} directories matching {:?} in {}", dirs.len(), name, path);
        Ok(dirs)
    }

    #[instrument(skip(self), level = "debug")]
    fn download_file(&self, remote_path: &str, local_path: &Path) -> SourceResult<bool> {
        let client = self.connected_client()?;

        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SourceError::download_caused_by(
                    format!("Failed to create local directory {}", parent.display()),
                    e,
                )
            })?;
        }

        client.download(remote_path, local_path).map_err(|e| {
            SourceError::download_caused_by(format!("Failed to download {}", remote_path), e)
        })?;

        info!("Downloaded {} to {}", remote_path, local_path.display());
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    fn upload_file(&self, local_path: &Path, remote_path: &str) -> SourceResult<bool> {
        if !local_path.exists() {
            return Err(SourceError::FileNotFound(local_path.display().to_string()));
        }

        let client = self.connected_client()?;

        if let Some(dir) = parent_dir(remote_path) {
            ensure_remote_dir(client, dir).map_err(|e| {
                SourceError::upload_caused_by(
                    format!("Failed to create remote directory {}", dir),
                    e,
                )
            })?;
        }

        client.upload(local_path, remote_path).map_err(|e| {
            SourceError::upload_caused_by(
                format!("Failed to upload {}", local_path.display()),
                e,
            )
        })?;

        info!("Uploaded {} to {}", local_path.display(), remote_path);
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    fn disconnect(&mut self) -> SourceResult<()> {
        self.connected = false;

        if let Some(client) = self.client.take() {
            client.close().map_err(|e| {
                SourceError::connection_caused_by("Failed to close Yandex Disk client", e)
            })?;
            info!("Disconnected from Yandex Disk");
        }
        Ok(())
    }
}
