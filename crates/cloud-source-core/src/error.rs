use thiserror::Error;

use crate::kind::SourceKind;

/// Boxed underlying failure kept as the cause of a domain error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by every source operation.
///
/// Backends translate their client's failures into one of these kinds and keep
/// the original failure reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Upload error: {message}")]
    Upload {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Download error: {message}")]
    Download {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{0} source is not implemented yet")]
    NotImplemented(SourceKind),

    #[error("{0} source was disconnected; create a new source to continue")]
    Disconnected(SourceKind),
}

impl SourceError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn connection_caused_by(
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    pub fn authentication_caused_by(
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self::Authentication {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    pub fn upload_caused_by(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Upload {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    pub fn download_caused_by(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Download {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// The human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Connection { message, .. }
            | Self::Authentication { message, .. }
            | Self::Upload { message, .. }
            | Self::Download { message, .. } => message.clone(),
            Self::FileNotFound(path) => path.clone(),
            Self::NotImplemented(_) | Self::Disconnected(_) => self.to_string(),
        }
    }
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised while resolving a backend selector or validating factory arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unsupported source type: {value}. Available types: {}", valid.join(", "))]
    UnknownKind { value: String, valid: Vec<&'static str> },

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
}
