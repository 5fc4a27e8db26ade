//! Yandex Disk backend for cloud-source.
//!
//! Provides both execution modes over the Yandex Disk REST API:
//! - `YadiskSource`: implements `Source`, operations suspend on I/O
//! - `BlockingYadiskSource`: implements `BlockingSource` on the calling thread
//!
//! Each source owns one client handle. The `DiskClient` / `BlockingDiskClient`
//! traits let callers substitute their own client.

mod api;
mod blocking;
mod blocking_api;
mod client;
mod error;
#[cfg(test)]
mod fake;
mod source;

pub use api::{YadiskClient, DEFAULT_BASE_URL};
pub use blocking::BlockingYadiskSource;
pub use blocking_api::BlockingYadiskClient;
pub use client::{BlockingDiskClient, DiskClient};
pub use error::ClientError;
pub use source::YadiskSource;
