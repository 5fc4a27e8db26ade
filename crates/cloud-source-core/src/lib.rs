//! Core traits and types for cloud-source storage backends.
//!
//! This crate defines the abstractions shared between backend implementations:
//! - `BlockingSource`: directory listing, search, upload and download on the calling thread
//! - `Source`: the same operations, suspending on I/O
//! - `SourceError`: the closed set of errors every backend reports
//! - `SourceKind` / `SourceConfig`: backend selection and caller settings

mod config;
mod entry;
mod error;
mod kind;
pub mod path;
mod source;

pub use config::SourceConfig;
pub use entry::{directory_paths, matching_directory_paths, DirectoryEntry, EntryType};
pub use error::{BoxError, ResolveError, SourceError, SourceResult};
pub use kind::SourceKind;
pub use source::{BlockingSource, Source, ROOT};
