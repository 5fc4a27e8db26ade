//! Backend-agnostic directory listing, search, upload and download for cloud storage.
//!
//! Callers pick a backend through [`SourceFactory`] and only ever see the
//! [`BlockingSource`] / [`Source`] traits and the [`SourceError`] taxonomy:
//!
//! ```no_run
//! use cloud_source::{Source, SourceFactory, SourceKind, ROOT};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceFactory::create_source(Some("oauth-token"), Some(SourceKind::YandexDisk.into()), None)?;
//! if source.connect().await? {
//!     for dir in source.list_directories(ROOT).await? {
//!         println!("{dir}");
//!     }
//! }
//! source.disconnect().await?;
//! # Ok(())
//! # }
//! ```

mod factory;
mod stub;

pub use cloud_source_core::{
    BlockingSource, BoxError, DirectoryEntry, EntryType, ResolveError, Source, SourceConfig,
    SourceError, SourceKind, SourceResult, ROOT,
};
pub use cloud_source_yadisk::{
    BlockingYadiskClient, BlockingYadiskSource, ClientError, YadiskClient, YadiskSource,
};
pub use factory::{AnySource, SourceFactory, SourceSelector};
pub use stub::{GoogleDriveSource, S3Source};
