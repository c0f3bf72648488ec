//! Source-package inspection
//!
//! A build inspector looks at one directory (not its subdirectories) and
//! reports the package it contains.

mod constraint;
mod go;

pub use go::GoInspector;

use std::path::{Path, PathBuf};

use crate::model::SourcePackage;

/// File suffix that marks a directory as worth inspecting
pub const SOURCE_SUFFIX: &str = ".go";

pub fn is_source_file(name: &str) -> bool {
    name.ends_with(SOURCE_SUFFIX)
}

/// Why a directory could not be turned into a package
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("loading the Go grammar: {0}")]
    Grammar(String),

    #[error("{file}:{line}: {message}")]
    Syntax {
        file: String,
        line: usize,
        message: String,
    },

    #[error("found packages {first} ({first_file}) and {second} ({second_file}) in {}", dir.display())]
    MultiplePackages {
        dir: PathBuf,
        first: String,
        first_file: String,
        second: String,
        second_file: String,
    },
}

pub trait BuildInspector {
    /// Inspect a single directory.
    ///
    /// `Ok(None)` means the directory holds no buildable files, for
    /// instance when every source file is excluded by a build constraint.
    fn inspect(&self, dir: &Path) -> Result<Option<SourcePackage>, InspectError>;
}

impl<T: BuildInspector + ?Sized> BuildInspector for &T {
    fn inspect(&self, dir: &Path) -> Result<Option<SourcePackage>, InspectError> {
        (**self).inspect(dir)
    }
}
