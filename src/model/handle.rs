use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Repository identifier: the canonical URL without its scheme.
///
/// For `https://github.com/stretchr/testify` this is
/// `github.com/stretchr/testify`. It doubles as the on-disk checkout key and
/// as the import-path root for the repository's packages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    pub fn from_url(url: &str) -> Self {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        let rest = rest.trim_end_matches('/');
        let rest = rest.strip_suffix(".git").unwrap_or(rest);
        Self(rest.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Owner and repository name, the second and third path segments
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        let mut parts = self.0.split('/');
        let _host = parts.next()?;
        let owner = parts.next().filter(|s| !s.is_empty())?;
        let name = parts.next().filter(|s| !s.is_empty())?;
        Some((owner, name))
    }

    /// Local worktree location under the cache root
    pub fn checkout_path(&self, cache_root: &Path) -> PathBuf {
        let mut path = cache_root.join("repos");
        for segment in self.0.split('/') {
            path.push(segment);
        }
        path
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tag naming and directory layout convention of a repository
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dialect {
    /// `v1.2.3` tags, import paths rooted at the handle
    Generic,
    /// The Go distribution itself: `go1.2.3` tags, packages under `src/`
    Distribution,
}

impl Dialect {
    pub fn for_handle(handle: &Handle, distribution_handle: &str) -> Self {
        if handle.as_str() == distribution_handle {
            Dialect::Distribution
        } else {
            Dialect::Generic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_stripped() {
        assert_eq!(
            Handle::from_url("https://github.com/stretchr/testify").as_str(),
            "github.com/stretchr/testify"
        );
        assert_eq!(
            Handle::from_url("http://forge.example/owner/project/").as_str(),
            "forge.example/owner/project"
        );
        assert_eq!(
            Handle::from_url("forge.example/owner/project").as_str(),
            "forge.example/owner/project"
        );
    }

    #[test]
    fn test_git_suffix_is_stripped() {
        assert_eq!(
            Handle::from_url("https://github.com/stretchr/testify.git").as_str(),
            "github.com/stretchr/testify"
        );
        assert_eq!(Handle::from_url("https://github.com/o/p.git/").as_str(), "github.com/o/p");
    }

    #[test]
    fn test_owner_and_name() {
        let handle = Handle::from_url("https://github.com/golang/go");
        assert_eq!(handle.owner_and_name(), Some(("golang", "go")));
        assert_eq!(Handle::from_url("https://github.com/golang").owner_and_name(), None);
    }

    #[test]
    fn test_checkout_path_nests_segments() {
        let handle = Handle::from_url("https://forge.example/owner/project");
        let path = handle.checkout_path(Path::new("/cache"));
        assert_eq!(path, PathBuf::from("/cache/repos/forge.example/owner/project"));
    }

    #[test]
    fn test_dialect_for_handle() {
        let go = Handle::from_url("https://github.com/golang/go");
        let other = Handle::from_url("https://github.com/golang/tools");
        assert_eq!(Dialect::for_handle(&go, "github.com/golang/go"), Dialect::Distribution);
        assert_eq!(Dialect::for_handle(&other, "github.com/golang/go"), Dialect::Generic);
    }
}
