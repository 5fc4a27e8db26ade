//! Helpers for `/`-separated remote paths.

/// Parent directory of `path` that still needs to exist before `path` can be
/// created, or `None` when the parent is the root (`/`), empty or `.`.
///
/// A `disk:` scheme prefix is preserved on the returned parent.
pub fn parent_dir(path: &str) -> Option<&str> {
    let (scheme_len, rest) = match path.find(":/") {
        Some(idx) if !path[..idx].contains('/') => (idx + 1, &path[idx + 1..]),
        _ => (0, path),
    };

    let trimmed = rest.trim_end_matches('/');
    let idx = trimmed.rfind('/')?;
    let parent = trimmed[..idx].trim_end_matches('/');

    if parent.is_empty() || parent == "." {
        return None;
    }
    Some(&path[..scheme_len + parent.len()])
}

/// Strip a backend scheme prefix such as `disk:` from a reported path.
pub fn strip_scheme<'a>(path: &'a str, scheme: &str) -> &'a str {
    match path.strip_prefix(scheme) {
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/a/b/c.txt"), Some("/a/b"));
        assert_eq!(parent_dir("/a/b"), Some("/a"));
        assert_eq!(parent_dir("/a/b/"), Some("/a"));
        assert_eq!(parent_dir("a/b"), Some("a"));
        assert_eq!(parent_dir("disk:/a/b"), Some("disk:/a"));
    }

    #[test]
    fn test_parent_dir_stops_at_root() {
        assert_eq!(parent_dir("/a"), None);
        assert_eq!(parent_dir("/remote.bin"), None);
        assert_eq!(parent_dir("disk:/a"), None);
        assert_eq!(parent_dir("c.txt"), None);
        assert_eq!(parent_dir("./c.txt"), None);
        assert_eq!(parent_dir("/"), None);
        assert_eq!(parent_dir(""), None);
    }

    #[test]
    fn test_parent_dir_repeated_separators() {
        assert_eq!(parent_dir("//a"), None);
        assert_eq!(parent_dir("disk://a"), None);
        assert_eq!(parent_dir("/a//b"), Some("/a"));
        assert_eq!(parent_dir("/a///b/c"), Some("/a///b"));
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("disk:/Test", "disk:"), "/Test");
        assert_eq!(strip_scheme("/Test", "disk:"), "/Test");
        assert_eq!(strip_scheme("disk:x", "disk:"), "disk:x");
    }
}
