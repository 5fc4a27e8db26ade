use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Storage backends known to the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    YandexDisk,
    GoogleDrive,
    S3,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::YandexDisk, Self::GoogleDrive, Self::S3];

    /// Canonical identifier used for string resolution and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::YandexDisk => "yandex_disk",
            Self::GoogleDrive => "google_drive",
            Self::S3 => "s3",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::YandexDisk => "Yandex Disk",
            Self::GoogleDrive => "Google Drive",
            Self::S3 => "S3",
        }
    }

    /// Every known kind is accepted by the factory.
    pub fn is_supported(self) -> bool {
        true
    }

    /// Whether the backend has a working implementation (others resolve to stubs).
    pub fn is_implemented(self) -> bool {
        matches!(self, Self::YandexDisk)
    }

    pub fn valid_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SourceKind {
    type Err = ResolveError;

    /// Case-insensitive; hyphens and whitespace count as `_`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .to_lowercase()
            .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ResolveError::UnknownKind {
                value: value.to_string(),
                valid: Self::valid_names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spelling_variants() {
        for raw in ["Yandex-Disk", "yandex disk", "YANDEX_DISK", " yandex -  disk "] {
            assert_eq!(raw.parse::<SourceKind>(), Ok(SourceKind::YandexDisk), "{raw}");
        }
        assert_eq!("Google Drive".parse::<SourceKind>(), Ok(SourceKind::GoogleDrive));
        assert_eq!("S3".parse::<SourceKind>(), Ok(SourceKind::S3));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "dropbox".parse::<SourceKind>().unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownKind {
                value: "dropbox".to_string(),
                valid: vec!["yandex_disk", "google_drive", "s3"],
            }
        );
        assert!("".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_support_flags() {
        assert!(SourceKind::ALL.iter().all(|k| k.is_supported()));
        assert!(SourceKind::YandexDisk.is_implemented());
        assert!(!SourceKind::GoogleDrive.is_implemented());
        assert!(!SourceKind::S3.is_implemented());
    }

    #[test]
    fn test_serde_matches_canonical_names() {
        for kind in SourceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
