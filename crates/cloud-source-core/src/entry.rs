use serde::{Deserialize, Serialize};

/// Kind of a remote item as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Dir,
    File,
}

/// An item from a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Item name (last path segment)
    pub name: String,
    /// Absolute remote path, `/`-separated
    pub path: String,
}

impl DirectoryEntry {
    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            entry_type: EntryType::Dir,
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            entry_type: EntryType::File,
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }

    /// Case-insensitive substring match on the entry name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Paths of the directories in `entries`, in listing order.
pub fn directory_paths<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = DirectoryEntry>,
{
    entries
        .into_iter()
        .filter(DirectoryEntry::is_dir)
        .map(|e| e.path)
        .collect()
}

/// Paths of the directories in `entries` whose name contains `name`, in listing order.
pub fn matching_directory_paths<I>(entries: I, name: &str) -> Vec<String>
where
    I: IntoIterator<Item = DirectoryEntry>,
{
    entries
        .into_iter()
        .filter(|e| e.is_dir() && e.name_contains(name))
        .map(|e| e.path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<DirectoryEntry> {
        vec![
            DirectoryEntry::dir("Test", "/Test"),
            DirectoryEntry::file("a.txt", "/a.txt"),
            DirectoryEntry::dir("Photos", "/Photos"),
            DirectoryEntry::dir("latest", "/latest"),
        ]
    }

    #[test]
    fn test_directory_paths_keeps_order() {
        assert_eq!(
            directory_paths(listing()),
            vec!["/Test", "/Photos", "/latest"]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            matching_directory_paths(listing(), "TES"),
            vec!["/Test", "/latest"]
        );
        assert!(matching_directory_paths(listing(), "zzz").is_empty());
    }

    #[test]
    fn test_files_never_match() {
        assert!(matching_directory_paths(listing(), "a.txt").is_empty());
    }
}
