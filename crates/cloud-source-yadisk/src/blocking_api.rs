//! Blocking flavour of the Yandex Disk API client.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::OnceLock;

use cloud_source_core::DirectoryEntry;
use reqwest::blocking::{Client, Response};
use reqwest::header::AUTHORIZATION;
use tracing::{debug, instrument, warn};

use crate::api::{
    auth_header, collect_page, error_from_status, page_query, Endpoints, Link, Resource,
    DEFAULT_BASE_URL,
};
use crate::client::BlockingDiskClient;
use crate::error::ClientError;

/// Copy a response body to `local_path`, removing the file again when the
/// body fails partway.
pub(crate) fn write_body<R: Read>(body: &mut R, local_path: &Path) -> Result<u64, ClientError> {
    let result = File::create(local_path).and_then(|mut file| {
        let written = io::copy(body, &mut file)?;
        file.flush()?;
        Ok(written)
    });

    result.map_err(|e| {
        if let Err(rm) = std::fs::remove_file(local_path) {
            if rm.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove partial download {}: {}", local_path.display(), rm);
            }
        }
        ClientError::Io(e)
    })
}

/// Yandex Disk API client (blocking).
///
/// The underlying HTTP client runs its own runtime and is only built on the
/// first request, so a `BlockingYadiskClient` can be constructed and dropped
/// anywhere.
///
/// # Panics
///
/// Requests panic when issued from inside an async runtime; run them on a
/// plain thread or in `tokio::task::spawn_blocking`.
pub struct BlockingYadiskClient {
    http: OnceLock<Client>,
    endpoints: Endpoints,
    token: String,
}

impl BlockingYadiskClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Self {
        Self {
            http: OnceLock::new(),
            endpoints: Endpoints::new(base_url),
            token: token.into(),
        }
    }

    fn http(&self) -> &Client {
        self.http.get_or_init(Client::new)
    }

    fn check(resp: Response, path: &str) -> Result<Response, ClientError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        Err(error_from_status(status, &body, path))
    }

    fn operation_link(&self, url: String, path: &str, extra: &[(&str, &str)]) -> Result<Link, ClientError> {
        let resp = self
            .http()
            .get(url)
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(&[("path", path)])
            .query(extra)
            .send()?;

        Ok(Self::check(resp, path)?.json()?)
    }
}

impl BlockingDiskClient for BlockingYadiskClient {
    #[instrument(skip(self), level = "debug")]
    fn check_token(&self) -> Result<bool, ClientError> {
        if self.token.is_empty() {
            return Ok(false);
        }

        let resp = self
            .http()
            .get(self.endpoints.disk())
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(&[("fields", "total_space")])
            .send()?;

        Self::check(resp, "/")?;
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, ClientError> {
        let mut entries: Vec<DirectoryEntry> = Vec::new();

        loop {
            let offset = entries.len().to_string();
            let resp = self
                .http()
                .get(self.endpoints.resources())
                .header(AUTHORIZATION, auth_header(&self.token))
                .query(&page_query(path, &offset))
                .send()?;

            let resource: Resource = Self::check(resp, path)?.json()?;
            if !collect_page(path, resource, &mut entries)? {
                break;
            }
        }

        debug!("Listed {} entries in {}", entries.len(), path);
        Ok(entries)
    }

    #[instrument(skip(self), level = "debug")]
    fn exists(&self, path: &str) -> Result<bool, ClientError> {
        let resp = self
            .http()
            .get(self.endpoints.resources())
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(&[("path", path), ("fields", "path")])
            .send()?;

        match Self::check(resp, path) {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self), level = "debug")]
    fn mkdir(&self, path: &str) -> Result<(), ClientError> {
        let resp = self
            .http()
            .put(self.endpoints.resources())
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(&[("path", path)])
            .send()?;

        Self::check(resp, path)?;
        debug!("Created remote directory {}", path);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), ClientError> {
        let link = self.operation_link(self.endpoints.download(), remote_path, &[])?;

        let resp = self.http().get(&link.href).send()?;
        let mut resp = Self::check(resp, remote_path)?;
        let written = write_body(&mut resp, local_path)?;

        debug!(
            "Downloaded {} bytes from {} to {}",
            written,
            remote_path,
            local_path.display()
        );
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn upload(&self, local_path: &Path, remote_path: &str) -> Result<(), ClientError> {
        let link = self.operation_link(
            self.endpoints.upload(),
            remote_path,
            &[("overwrite", "false")],
        )?;

        let file = File::open(local_path)?;
        let resp = self.http().put(&link.href).body(file).send()?;
        Self::check(resp, remote_path)?;

        debug!("Uploaded {} to {}", local_path.display(), remote_path);
        Ok(())
    }

    fn close(&self) -> Result<(), ClientError> {
        debug!("Closing blocking Yandex Disk client");
        Ok(())
    }
}
