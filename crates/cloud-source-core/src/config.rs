use serde::{Deserialize, Serialize};

use crate::kind::SourceKind;

/// Caller-owned settings used to build a source.
///
/// Deserializes from the same shape it serializes to:
///
/// ```json
/// { "token": "...", "source_type": "yandex_disk", "home_folder": "/Apps/neuro", "async_enabled": false }
/// ```
///
/// `async_enabled` is optional and defaults to `true`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    token: String,
    source_type: SourceKind,
    #[serde(default)]
    home_folder: String,
    #[serde(default = "default_async_enabled")]
    async_enabled: bool,
}

fn default_async_enabled() -> bool {
    true
}

impl SourceConfig {
    pub fn new(token: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            token: token.into(),
            source_type: kind,
            home_folder: String::new(),
            async_enabled: default_async_enabled(),
        }
    }

    pub fn with_home_folder(mut self, home_folder: impl Into<String>) -> Self {
        self.home_folder = home_folder.into();
        self
    }

    pub fn with_prefer_async(mut self, prefer_async: bool) -> Self {
        self.async_enabled = prefer_async;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn kind(&self) -> SourceKind {
        self.source_type
    }

    /// Default remote folder for the caller's files (empty when unset).
    pub fn home_folder(&self) -> &str {
        &self.home_folder
    }

    pub fn prefer_async(&self) -> bool {
        self.async_enabled
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("token", &"<redacted>")
            .field("source_type", &self.source_type)
            .field("home_folder", &self.home_folder)
            .field("async_enabled", &self.async_enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SourceConfig::new("tok", SourceKind::YandexDisk);
        assert_eq!(config.token(), "tok");
        assert_eq!(config.kind(), SourceKind::YandexDisk);
        assert_eq!(config.home_folder(), "");
        assert!(config.prefer_async());
    }

    #[test]
    fn test_builder() {
        let config = SourceConfig::new("tok", SourceKind::S3)
            .with_home_folder("/MATLLER")
            .with_prefer_async(false);
        assert_eq!(config.home_folder(), "/MATLLER");
        assert!(!config.prefer_async());
    }

    #[test]
    fn test_deserialize_defaults_async() {
        let config: SourceConfig = serde_json::from_str(
            r#"{"token": "abc", "source_type": "google_drive", "home_folder": "/work"}"#,
        )
        .unwrap();
        assert_eq!(config.kind(), SourceKind::GoogleDrive);
        assert_eq!(config.home_folder(), "/work");
        assert!(config.prefer_async());
    }

    #[test]
    fn test_deserialize_rejects_unknown_kind() {
        let result = serde_json::from_str::<SourceConfig>(
            r#"{"token": "abc", "source_type": "dropbox"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = SourceConfig::new("secret-token", SourceKind::YandexDisk);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("YandexDisk"));
    }
}
