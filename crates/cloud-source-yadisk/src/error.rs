use cloud_source_core::SourceError;
use thiserror::Error;

/// Errors raised by the Yandex Disk REST client.
///
/// These never leave a source method: the sources convert them into
/// [`SourceError`] and keep them as the cause.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Yandex Disk API error {status} ({error}): {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Map a token check failure: an explicit rejection is an authentication
    /// problem, anything else a connection problem.
    pub(crate) fn into_token_error(self) -> SourceError {
        match self {
            Self::Unauthorized(_) => {
                SourceError::authentication_caused_by("Invalid Yandex Disk token", self)
            }
            other => SourceError::connection_caused_by("Failed to check Yandex Disk token", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unauthorized_becomes_authentication_error() {
        let err = ClientError::Unauthorized("bad token".to_string()).into_token_error();
        assert!(matches!(err, SourceError::Authentication { .. }));
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("Unauthorized: bad token")
        );
    }

    #[test]
    fn test_other_failures_become_connection_error() {
        let err = ClientError::Api {
            status: 503,
            error: "ServiceUnavailable".to_string(),
            message: "try later".to_string(),
        }
        .into_token_error();
        assert!(matches!(err, SourceError::Connection { .. }));
        assert!(err.source().is_some());
    }
}
