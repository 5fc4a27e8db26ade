//! In-memory disk used by the source tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use cloud_source_core::DirectoryEntry;

use crate::client::{BlockingDiskClient, DiskClient};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TokenCheck {
    #[default]
    Valid,
    Invalid,
    Unauthorized,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CheckToken,
    ListDirectory(String),
    Exists(String),
    Mkdir(String),
    Download(String),
    Upload(String),
    Close,
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub token: TokenCheck,
    pub listings: HashMap<String, Vec<DirectoryEntry>>,
    pub existing: HashSet<String>,
    /// Directories another client creates between our `exists` and `mkdir`.
    pub created_concurrently: HashSet<String>,
    pub files: HashMap<String, Vec<u8>>,
    pub fail_transfers: bool,
    pub fail_mkdir: bool,
    pub calls: Vec<Call>,
}

/// Cloneable handle; clones share state so tests can inspect calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeDisk {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDisk {
    pub fn with_root_listing() -> Self {
        let disk = Self::default();
        disk.state().listings.insert(
            "/".to_string(),
            vec![
                DirectoryEntry::dir("Test", "/Test"),
                DirectoryEntry::file("a.txt", "/a.txt"),
            ],
        );
        disk
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    fn record(&self, call: Call) -> MutexGuard<'_, FakeState> {
        let mut state = self.state();
        state.calls.push(call);
        state
    }

    fn do_check_token(&self) -> Result<bool, ClientError> {
        match self.record(Call::CheckToken).token {
            TokenCheck::Valid => Ok(true),
            TokenCheck::Invalid => Ok(false),
            TokenCheck::Unauthorized => Err(ClientError::Unauthorized("bad token".to_string())),
            TokenCheck::Unreachable => Err(ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }

    fn do_list(&self, path: &str) -> Result<Vec<DirectoryEntry>, ClientError> {
        self.record(Call::ListDirectory(path.to_string()))
            .listings
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(path.to_string()))
    }

    fn do_exists(&self, path: &str) -> Result<bool, ClientError> {
        Ok(self
            .record(Call::Exists(path.to_string()))
            .existing
            .contains(path))
    }

    fn do_mkdir(&self, path: &str) -> Result<(), ClientError> {
        let mut state = self.record(Call::Mkdir(path.to_string()));
        if state.fail_mkdir {
            return Err(ClientError::Api {
                status: 403,
                error: "DiskResourceLockedError".to_string(),
                message: "resource is locked".to_string(),
            });
        }
        let raced = state.created_concurrently.remove(path);
        if !state.existing.insert(path.to_string()) || raced {
            return Err(ClientError::AlreadyExists(path.to_string()));
        }
        Ok(())
    }

    fn do_download(&self, remote_path: &str, local_path: &Path) -> Result<(), ClientError> {
        let state = self.record(Call::Download(remote_path.to_string()));
        if state.fail_transfers {
            return Err(ClientError::Api {
                status: 500,
                error: "InternalError".to_string(),
                message: "download failed".to_string(),
            });
        }
        let data = state
            .files
            .get(remote_path)
            .ok_or_else(|| ClientError::NotFound(remote_path.to_string()))?;
        std::fs::write(local_path, data)?;
        Ok(())
    }

    fn do_upload(&self, local_path: &Path, remote_path: &str) -> Result<(), ClientError> {
        let mut state = self.record(Call::Upload(remote_path.to_string()));
        if state.fail_transfers {
            return Err(ClientError::Api {
                status: 507,
                error: "DiskInsufficientStorageError".to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        let data = std::fs::read(local_path)?;
        state.files.insert(remote_path.to_string(), data);
        Ok(())
    }
}

#[async_trait]
impl DiskClient for FakeDisk {
    async fn check_token(&self) -> Result<bool, ClientError> {
        self.do_check_token()
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, ClientError> {
        self.do_list(path)
    }

    async fn exists(&self, path: &str) -> Result<bool, ClientError> {
        self.do_exists(path)
    }

    async fn mkdir(&self, path: &str) -> Result<(), ClientError> {
        self.do_mkdir(path)
    }

    async fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), ClientError> {
        self.do_download(remote_path, local_path)
    }

    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<(), ClientError> {
        self.do_upload(local_path, remote_path)
    }

    async fn close(&self) -> Result<(), ClientError> {
        self.record(Call::Close);
        Ok(())
    }
}

impl BlockingDiskClient for FakeDisk {
    fn check_token(&self) -> Result<bool, ClientError> {
        self.do_check_token()
    }

    fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, ClientError> {
        self.do_list(path)
    }

    fn exists(&self, path: &str) -> Result<bool, ClientError> {
        self.do_exists(path)
    }

    fn mkdir(&self, path: &str) -> Result<(), ClientError> {
        self.do_mkdir(path)
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), ClientError> {
        self.do_download(remote_path, local_path)
    }

    fn upload(&self, local_path: &Path, remote_path: &str) -> Result<(), ClientError> {
        self.do_upload(local_path, remote_path)
    }

    fn close(&self) -> Result<(), ClientError> {
        self.record(Call::Close);
        Ok(())
    }
}
