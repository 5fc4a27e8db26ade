//! Yandex Disk [`Source`] implementation (suspending).

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use cloud_source_core::path::parent_dir;
use cloud_source_core::{
    directory_paths, matching_directory_paths, DirectoryEntry, Source, SourceError, SourceKind,
    SourceResult,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info, instrument, warn};

use crate::api::YadiskClient;
use crate::client::DiskClient;
use crate::error::ClientError;

const KIND: SourceKind = SourceKind::YandexDisk;

/// Yandex Disk source whose operations suspend on I/O.
///
/// The client handle is created eagerly and released by `disconnect`; every
/// other operation afterwards fails with [`SourceError::Disconnected`].
pub struct YadiskSource<C = YadiskClient> {
    token: String,
    client: RwLock<Option<Arc<C>>>,
    connected: AtomicBool,
}

impl YadiskSource<YadiskClient> {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let client = YadiskClient::new(token.clone());
        Self::with_client(token, client)
    }
}

impl<C: DiskClient> YadiskSource<C> {
    /// Source backed by a caller-supplied client.
    pub fn with_client(token: impl Into<String>, client: C) -> Self {
        Self {
            token: token.into(),
            client: RwLock::new(Some(Arc::new(client))),
            connected: AtomicBool::new(false),
        }
    }

    fn client(&self) -> SourceResult<Arc<C>> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SourceError::Disconnected(KIND))
    }

    fn connected_client(&self) -> SourceResult<Arc<C>> {
        let client = self.client()?;
        if !self.connected.load(Ordering::Acquire) {
            return Err(SourceError::connection(
                "Not connected to Yandex Disk; call connect() first",
            ));
        }
        Ok(client)
    }

    async fn entries(&self, path: &str) -> SourceResult<Vec<DirectoryEntry>> {
        let client = self.connected_client()?;
        client.list_directory(path).await.map_err(|e| {
            SourceError::connection_caused_by(format!("Failed to list directory {}", path), e)
        })
    }
}

/// Make sure the remote directory `path` exists, creating ancestors first.
///
/// A `mkdir` that loses a race against another creator counts as success.
fn ensure_remote_dir<'a, C: DiskClient>(
    client: &'a C,
    path: &'a str,
) -> BoxFuture<'a, Result<(), ClientError>> {
    async move {
        if client.exists(path).await? {
            return Ok(());
        }

        if let Some(parent) = parent_dir(path) {
            ensure_remote_dir(client, parent).await?;
        }

        match client.mkdir(path).await {
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
    .boxed()
}

#[async_trait]
impl<C: DiskClient + 'static> Source for YadiskSource<C> {
    fn kind(&self) -> SourceKind {
        KIND
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    #[instrument(skip(self), level = "debug")]
    async fn connect(&self) -> SourceResult<bool> {
        if !self.check_connection().await? {
            warn!("Yandex Disk rejected the token");
            return Ok(false);
        }

        self.connected.store(true, Ordering::Release);
        info!("Connected to Yandex Disk");
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    async fn check_connection(&self) -> SourceResult<bool> {
        let client = self.client()?;
        client
            .check_token()
            .await
            .map_err(ClientError::into_token_error)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_directories(&self, path: &str) -> SourceResult<Vec<String>> {
        let dirs = directory_paths(self.entries(path).await?);
        debug!("Found {} directories in {}", dirs.len(), path);
        Ok(dirs)
    }

    #[instrument(skip(self), level = "debug")]
    async fn search_directories(&self, name: &str, path: &str) -> SourceResult<Vec<String>> {
        let dirs = matching_directory_paths(self.entries(path).await?, name);
        debug!("Found {} directories matching {:?} in {}", dirs.len(), name, path);
        Ok(dirs)
    }

    #[instrument(skip(self), level = "debug")]
    async fn download_file(&self, remote_path: &str, local_path: &Path) -> SourceResult<bool> {
        let client = self.connected_client()?;

        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SourceError::download_caused_by(
                    format!("Failed to create local directory {}", parent.display()),
                    e,
                )
            })?;
        }

        client
            .download(remote_path, local_path)
            .await
            .map_err(|e| {
                SourceError::download_caused_by(format!("Failed to download {}", remote_path), e)
            })?;

        info!("Downloaded {} to {}", remote_path, local_path.display());
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    async fn upload_file(&self, local_path: &Path, remote_path: &str) -> SourceResult<bool> {
        if !matches!(tokio::fs::try_exists(local_path).await, Ok(true)) {
            return Err(SourceError::FileNotFound(local_path.display().to_string()));
        }

        let client = self.connected_client()?;

        if let Some(dir) = parent_dir(remote_path) {
            ensure_remote_dir(client.as_ref(), dir).await.map_err(|e| {
                SourceError::upload_caused_by(
                    format!("Failed to create remote directory {}", dir),
                    e,
                )
            })?;
        }

        client.upload(local_path, remote_path).await.map_err(|e| {
            SourceError::upload_caused_by(
                format!("Failed to upload {}", local_path.display()),
                e,
            )
        })?;

        info!("Uploaded {} to {}", local_path.display(), remote_path);
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    async fn disconnect(&self) -> SourceResult<()> {
        let client = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.connected.store(false, Ordering::Release);

        if let Some(client) = client {
            client.close().await.map_err(|e| {
                SourceError::connection_caused_by("Failed to close Yandex Disk client", e)
            })?;
            info!("Disconnected from Yandex Disk");
        }
        Ok(())
    }
}
