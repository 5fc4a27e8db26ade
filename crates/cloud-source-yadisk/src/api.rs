//! Yandex Disk REST API v1 client.
//!
//! Paths are passed as-is (`/dir/file` or `disk:/dir/file`); listing results
//! are reported without the `disk:` prefix.

use std::path::Path;

use async_trait::async_trait;
use cloud_source_core::path::strip_scheme;
use cloud_source_core::{DirectoryEntry, EntryType};
use futures::{Stream, StreamExt};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::client::DiskClient;
use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://cloud-api.yandex.net/v1/disk";

/// Items requested per listing page.
pub(crate) const PAGE_LIMIT: usize = 1000;
const PAGE_LIMIT_STR: &str = "1000";

const LIST_FIELDS: &str = "_embedded.items.name,_embedded.items.path,_embedded.items.type,_embedded.total";

/// Error body returned by the API.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    description: String,
}

/// Operation link returned by the download/upload endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Link {
    pub href: String,
}

/// Metadata of a resource; `_embedded` is present for directories only.
#[derive(Debug, Deserialize)]
pub(crate) struct Resource {
    #[serde(rename = "_embedded")]
    pub embedded: Option<ResourceList>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceList {
    #[serde(default)]
    pub items: Vec<RawItem>,
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: EntryType,
}

impl From<RawItem> for DirectoryEntry {
    fn from(item: RawItem) -> Self {
        let path = strip_scheme(&item.path, "disk:").to_string();
        DirectoryEntry {
            entry_type: item.item_type,
            name: item.name,
            path,
        }
    }
}

/// Shared URL layout of both clients.
#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn disk(&self) -> &str {
        &self.base
    }

    pub fn resources(&self) -> String {
        format!("{}/resources", self.base)
    }

    pub fn download(&self) -> String {
        format!("{}/resources/download", self.base)
    }

    pub fn upload(&self) -> String {
        format!("{}/resources/upload", self.base)
    }
}

pub(crate) fn auth_header(token: &str) -> String {
    format!("OAuth {}", token)
}

pub(crate) fn page_query<'a>(path: &'a str, offset: &'a str) -> [(&'static str, &'a str); 4] {
    [
        ("path", path),
        ("limit", PAGE_LIMIT_STR),
        ("offset", offset),
        ("fields", LIST_FIELDS),
    ]
}

/// Convert a page into entries; returns whether more pages remain.
pub(crate) fn collect_page(
    path: &str,
    resource: Resource,
    entries: &mut Vec<DirectoryEntry>,
) -> Result<bool, ClientError> {
    let list = resource
        .embedded
        .ok_or_else(|| ClientError::NotADirectory(path.to_string()))?;

    let received = list.items.len();
    entries.extend(list.items.into_iter().map(DirectoryEntry::from));

    let more = match list.total {
        Some(total) => (entries.len() as u64) < total && received > 0,
        None => received == PAGE_LIMIT,
    };
    Ok(more)
}

/// Map an unsuccessful status and its body to a client error.
pub(crate) fn error_from_status(status: StatusCode, body: &str, path: &str) -> ClientError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = if !parsed.message.is_empty() {
        parsed.message
    } else if !parsed.description.is_empty() {
        parsed.description
    } else {
        body.to_string()
    };

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(path.to_string()),
        StatusCode::CONFLICT if parsed.error == "DiskPathPointsToExistentDirectoryError" => {
            ClientError::AlreadyExists(path.to_string())
        }
        _ => ClientError::Api {
            status: status.as_u16(),
            error: parsed.error,
            message,
        },
    }
}

/// Write a body stream to `local_path`.
///
/// A stream that fails partway leaves no truncated file behind.
pub(crate) async fn write_stream<S, B, E>(stream: S, local_path: &Path) -> Result<usize, ClientError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    ClientError: From<E>,
{
    let result = copy_stream(stream, local_path).await;
    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(local_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove partial download {}: {}", local_path.display(), e);
            }
        }
    }
    result
}

async fn copy_stream<S, B, E>(stream: S, local_path: &Path) -> Result<usize, ClientError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    ClientError: From<E>,
{
    let mut stream = std::pin::pin!(stream);
    let mut file = tokio::fs::File::create(local_path).await?;
    let mut written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(chunk.as_ref()).await?;
        written += chunk.as_ref().len();
    }
    file.flush().await?;
    Ok(written)
}

/// Yandex Disk API client (suspending).
pub struct YadiskClient {
    http: Client,
    endpoints: Endpoints,
    token: String,
}

impl YadiskClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Client talking to another API root (e.g. a mock server).
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            endpoints: Endpoints::new(base_url),
            token: token.into(),
        }
    }

    async fn check(resp: Response, path: &str) -> Result<Response, ClientError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(error_from_status(status, &body, path))
    }

    async fn operation_link(&self, url: String, query: &[(&str, &str)]) -> Result<Link, ClientError> {
        let path = query
            .iter()
            .find(|(k, _)| *k == "path")
            .map(|(_, v)| *v)
            .unwrap_or_default();

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(query)
            .send()
            .await?;

        Ok(Self::check(resp, path).await?.json().await?)
    }
}

#[async_trait]
impl DiskClient for YadiskClient {
    #[instrument(skip(self), level = "debug")]
    async fn check_token(&self) -> Result<bool, ClientError> {
        if self.token.is_empty() {
            return Ok(false);
        }

        let resp = self
            .http
            .get(self.endpoints.disk())
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(&[("fields", "total_space")])
            .send()
            .await?;

        Self::check(resp, "/").await?;
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, ClientError> {
        let mut entries: Vec<DirectoryEntry> = Vec::new();

        loop {
            let offset = entries.len().to_string();
            let resp = self
                .http
                .get(self.endpoints.resources())
                .header(AUTHORIZATION, auth_header(&self.token))
                .query(&page_query(path, &offset))
                .send()
                .await?;

            let resource: Resource = Self::check(resp, path).await?.json().await?;
            if !collect_page(path, resource, &mut entries)? {
                break;
            }
        }

        debug!("Listed {} entries in {}", entries.len(), path);
        Ok(entries)
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, path: &str) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(self.endpoints.resources())
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(&[("path", path), ("fields", "path")])
            .send()
            .await?;

        match Self::check(resp, path).await {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn mkdir(&self, path: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .put(self.endpoints.resources())
            .header(AUTHORIZATION, auth_header(&self.token))
            .query(&[("path", path)])
            .send()
            .await?;

        Self::check(resp, path).await?;
        debug!("Created remote directory {}", path);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), ClientError> {
        let link = self
            .operation_link(self.endpoints.download(), &[("path", remote_path)])
            .await?;

        let resp = self.http.get(&link.href).send().await?;
        let resp = Self::check(resp, remote_path).await?;

        let written = write_stream(resp.bytes_stream(), local_path).await?;

        debug!(
            "Downloaded {} bytes from {} to {}",
            written,
            remote_path,
            local_path.display()
        );
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<(), ClientError> {
        let link = self
            .operation_link(
                self.endpoints.upload(),
                &[("path", remote_path), ("overwrite", "false")],
            )
            .await?;

        let file = tokio::fs::File::open(local_path).await?;
        let resp = self.http.put(&link.href).body(file).send().await?;
        Self::check(resp, remote_path).await?;

        debug!("Uploaded {} to {}", local_path.display(), remote_path);
        Ok(())
    }

    async fn close(&self) -> Result<(), ClientError> {
        // Pooled connections are released when the last handle drops.
        debug!("Closing Yandex Disk client");
        Ok(())
    }
}
