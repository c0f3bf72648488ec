//! Package discovery over a checked-out worktree
//!
//! Each directory contributes at most one package. Subdirectory results
//! come first, in name order, followed by the directory's own package.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{CrawlError, Result};
use crate::inspect::{is_source_file, BuildInspector};
use crate::model::{Dialect, Handle, Package};

/// Directory names never descended into
const EXCLUDED_DIRS: &[&str] = &[".", "internal", "vendor"];

const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".bzr"];

/// Library sources of the distribution repository live under this directory
const DISTRIBUTION_ROOT: &str = "src";

pub struct PackageWalker<'a, I: BuildInspector> {
    root: &'a Path,
    handle: &'a Handle,
    dialect: Dialect,
    inspector: &'a I,
}

impl<'a, I: BuildInspector> PackageWalker<'a, I> {
    pub fn new(root: &'a Path, handle: &'a Handle, dialect: Dialect, inspector: &'a I) -> Self {
        Self { root, handle, dialect, inspector }
    }

    /// Walk the whole worktree. Unreadable directories abort the walk;
    /// directories that fail to build become error stubs.
    pub fn walk(&self) -> Result<Vec<Package>> {
        self.walk_dir(self.root)
    }

    fn walk_dir(&self, dir: &Path) -> Result<Vec<Package>> {
        let mut entries: Vec<(OsString, bool)> = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| CrawlError::io("read directory", dir, e))? {
            let entry = entry.map_err(|e| CrawlError::io("read directory", dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| CrawlError::io("stat", entry.path(), e))?;
            entries.push((entry.file_name(), file_type.is_dir()));
        }
        entries.sort();

        let mut packages = Vec::new();
        let mut own: Option<Package> = None;
        let mut resolved = !self.holds_package(dir);

        for (file_name, is_dir) in entries {
            // names only steer the walk; paths keep the raw file name
            let name = file_name.to_string_lossy();
            let path = dir.join(&file_name);
            if is_dir {
                if self.descends_into(&name, &path) {
                    packages.extend(self.walk_dir(&path)?);
                }
                continue;
            }
            // the first source file settles the directory
            if !resolved && is_source_file(&name) {
                resolved = true;
                own = self.resolve(dir);
            }
        }

        packages.extend(own);
        Ok(packages)
    }

    /// The distribution's checkout root and its library roots (`src`,
    /// `src/pkg`) have no import path of their own
    fn holds_package(&self, dir: &Path) -> bool {
        match self.dialect {
            Dialect::Generic => true,
            Dialect::Distribution => !self.import_path(dir).is_empty(),
        }
    }

    fn descends_into(&self, name: &str, path: &Path) -> bool {
        if EXCLUDED_DIRS.contains(&name) || VCS_DIRS.contains(&name) {
            return false;
        }
        match self.dialect {
            Dialect::Generic => true,
            Dialect::Distribution => {
                name != "testdata"
                    && matches!(
                        self.relative(path).components().next(),
                        Some(Component::Normal(first)) if first == DISTRIBUTION_ROOT
                    )
            }
        }
    }

    fn resolve(&self, dir: &Path) -> Option<Package> {
        let import_path = self.import_path(dir);
        match self.inspector.inspect(dir) {
            Ok(Some(source)) => {
                debug!("package = {}", import_path);
                Some(Package::from_source(import_path, source))
            }
            Ok(None) => None,
            Err(err) => {
                warn!("package {} does not build: {}", import_path, err);
                Some(Package::failed(import_path, err.to_string()))
            }
        }
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root).map(Path::to_path_buf).unwrap_or_default()
    }

    /// Import path of a directory inside the worktree
    pub fn import_path(&self, dir: &Path) -> String {
        let rel = self.relative(dir);
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        let rel = parts.join("/");

        match self.dialect {
            Dialect::Generic if rel.is_empty() => self.handle.to_string(),
            Dialect::Generic => format!("{}/{}", self.handle, rel),
            Dialect::Distribution => {
                let below = match parts.as_slice() {
                    [src, pkg, rest @ ..] if src == DISTRIBUTION_ROOT && pkg == "pkg" => rest,
                    [src, rest @ ..] if src == DISTRIBUTION_ROOT => rest,
                    all => all,
                };
                below.join("/")
            }
        }
    }
}
