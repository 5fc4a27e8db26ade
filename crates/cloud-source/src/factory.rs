use std::sync::Arc;

use cloud_source_core::{BlockingSource, ResolveError, Source, SourceConfig, SourceKind};
use cloud_source_yadisk::{BlockingYadiskSource, YadiskSource};
use tracing::debug;

use crate::stub::{GoogleDriveSource, S3Source};

/// Anything the factory accepts as a backend selector.
#[derive(Debug, Clone, Copy)]
pub enum SourceSelector<'a> {
    /// Raw identifier such as `"yandex_disk"`, `"Yandex-Disk"` or `"yandex disk"`.
    Name(&'a str),
    Kind(SourceKind),
    Config(&'a SourceConfig),
}

impl<'a> From<&'a str> for SourceSelector<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for SourceSelector<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl From<SourceKind> for SourceSelector<'_> {
    fn from(kind: SourceKind) -> Self {
        Self::Kind(kind)
    }
}

impl<'a> From<&'a SourceConfig> for SourceSelector<'a> {
    fn from(config: &'a SourceConfig) -> Self {
        Self::Config(config)
    }
}

/// A source in the execution mode the configuration asked for.
pub enum AnySource {
    Blocking(Box<dyn BlockingSource>),
    Async(Arc<dyn Source>),
}

impl AnySource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Blocking(source) => source.kind(),
            Self::Async(source) => source.kind(),
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    pub fn into_blocking(self) -> Option<Box<dyn BlockingSource>> {
        match self {
            Self::Blocking(source) => Some(source),
            Self::Async(_) => None,
        }
    }

    pub fn into_async(self) -> Option<Arc<dyn Source>> {
        match self {
            Self::Async(source) => Some(source),
            Self::Blocking(_) => None,
        }
    }
}

/// Factory for creating sources.
///
/// Known but unimplemented backends still produce a source; its operations
/// fail with `SourceError::NotImplemented`.
pub struct SourceFactory;

impl SourceFactory {
    /// Resolve a selector to a backend kind.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnknownKind`, listing the valid identifiers, when a
    /// name matches no backend.
    pub fn resolve<'a>(selector: impl Into<SourceSelector<'a>>) -> Result<SourceKind, ResolveError> {
        match selector.into() {
            SourceSelector::Name(name) => name.parse(),
            SourceSelector::Kind(kind) => Ok(kind),
            SourceSelector::Config(config) => Ok(config.kind()),
        }
    }

    /// Create a blocking source.
    ///
    /// When `config` is given its token and kind win over the other arguments;
    /// otherwise both `token` and `selector` are required.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::MissingArgument` when neither `config` nor both
    /// `token` and `selector` are supplied, and `ResolveError::UnknownKind`
    /// when the selector does not resolve.
    ///
    /// # Panics
    ///
    /// Creating the source never panics, but a Yandex Disk source panics on
    /// network operations issued from inside an async runtime. Drive it from
    /// a plain thread or `tokio::task::spawn_blocking`.
    pub fn create_blocking_source(
        token: Option<&str>,
        selector: Option<SourceSelector<'_>>,
        config: Option<&SourceConfig>,
    ) -> Result<Box<dyn BlockingSource>, ResolveError> {
        let (token, kind) = Self::resolve_arguments(token, selector, config)?;
        Ok(Self::build_blocking(token, kind))
    }

    /// Create a source whose operations suspend on I/O.
    ///
    /// Same argument rules as [`SourceFactory::create_blocking_source`].
    pub fn create_source(
        token: Option<&str>,
        selector: Option<SourceSelector<'_>>,
        config: Option<&SourceConfig>,
    ) -> Result<Arc<dyn Source>, ResolveError> {
        let (token, kind) = Self::resolve_arguments(token, selector, config)?;
        Ok(Self::build_async(token, kind))
    }

    /// Create a source in the mode selected by `config.prefer_async()`.
    ///
    /// # Panics
    ///
    /// Never while creating. A blocking source has the runtime restriction
    /// described on [`SourceFactory::create_blocking_source`].
    pub fn from_config(config: &SourceConfig) -> AnySource {
        let token = config.token().to_string();
        if config.prefer_async() {
            AnySource::Async(Self::build_async(token, config.kind()))
        } else {
            AnySource::Blocking(Self::build_blocking(token, config.kind()))
        }
    }

    fn build_blocking(token: String, kind: SourceKind) -> Box<dyn BlockingSource> {
        debug!("Creating blocking {} source", kind);
        match kind {
            SourceKind::YandexDisk => Box::new(BlockingYadiskSource::new(token)),
            SourceKind::GoogleDrive => Box::new(GoogleDriveSource::new(token)),
            SourceKind::S3 => Box::new(S3Source::new(token)),
        }
    }

    fn build_async(token: String, kind: SourceKind) -> Arc<dyn Source> {
        debug!("Creating async {} source", kind);
        match kind {
            SourceKind::YandexDisk => Arc::new(YadiskSource::new(token)),
            SourceKind::GoogleDrive => Arc::new(GoogleDriveSource::new(token)),
            SourceKind::S3 => Arc::new(S3Source::new(token)),
        }
    }

    fn resolve_arguments(
        token: Option<&str>,
        selector: Option<SourceSelector<'_>>,
        config: Option<&SourceConfig>,
    ) -> Result<(String, SourceKind), ResolveError> {
        if let Some(config) = config {
            return Ok((config.token().to_string(), config.kind()));
        }

        let selector = selector.ok_or(ResolveError::MissingArgument("source type or config"))?;
        let kind = Self::resolve(selector)?;
        let token = token.ok_or(ResolveError::MissingArgument("token or config"))?;
        Ok((token.to_string(), kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_variants() {
        for raw in ["Yandex-Disk", "yandex disk", "YANDEX_DISK"] {
            assert_eq!(SourceFactory::resolve(raw), Ok(SourceKind::YandexDisk));
        }
        assert_eq!(SourceFactory::resolve(SourceKind::S3), Ok(SourceKind::S3));

        let config = SourceConfig::new("t", SourceKind::GoogleDrive);
        assert_eq!(SourceFactory::resolve(&config), Ok(SourceKind::GoogleDrive));

        let owned = String::from("s3");
        assert_eq!(SourceFactory::resolve(&owned), Ok(SourceKind::S3));
    }

    #[test]
    fn test_resolve_unknown_lists_options() {
        let err = SourceFactory::resolve("dropbox").unwrap_err();
        let msg = err.to_string();
        for name in SourceKind::valid_names() {
            assert!(msg.contains(name), "{msg}");
        }
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            SourceFactory::create_blocking_source(None, None, None).err(),
            Some(ResolveError::MissingArgument("source type or config"))
        );
        assert_eq!(
            SourceFactory::create_source(None, Some("s3".into()), None).err(),
            Some(ResolveError::MissingArgument("token or config"))
        );
    }

    #[test]
    fn test_config_wins_over_arguments() {
        let config = SourceConfig::new("from-config", SourceKind::S3);
        let source = SourceFactory::create_blocking_source(
            Some("ignored"),
            Some("yandex_disk".into()),
            Some(&config),
        )
        .unwrap();
        assert_eq!(source.kind(), SourceKind::S3);
        assert_eq!(source.token(), "from-config");
    }

    #[test]
    fn test_unknown_selector_is_rejected() {
        let result = SourceFactory::create_source(Some("t"), Some("dropbox".into()), None);
        assert!(matches!(result, Err(ResolveError::UnknownKind { .. })));
    }
}
