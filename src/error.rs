use std::path::PathBuf;

/// Errors that abort the crawl of a single repository.
///
/// Build failures inside individual package directories are not crawl
/// errors; they are recorded on the package descriptor instead.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("git {operation} failed in {}: {source}", path.display())]
    Git {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("I/O error during {operation} on {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("forge request for {handle} failed: {source}")]
    Forge {
        handle: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} does not name an owner/repository pair")]
    InvalidHandle(String),

    #[error("revision {rev} does not resolve to a commit in {}", path.display())]
    MissingRevision { rev: String, path: PathBuf },

    #[error("commit {id} has an out-of-range author timestamp {seconds}")]
    InvalidTimestamp { id: String, seconds: i64 },
}

impl CrawlError {
    pub(crate) fn git(operation: &'static str, path: impl Into<PathBuf>, source: git2::Error) -> Self {
        CrawlError::Git { operation, path: path.into(), source }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrawlError::Io { operation, path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
