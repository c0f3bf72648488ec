//! Version-control seam
//!
//! The crawler only talks to version control through these traits so the
//! classification and walking logic can run against fakes in tests.

use std::path::Path;

use time::OffsetDateTime;

use crate::error::Result;

/// A commit as seen by the classifier and the ref records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Hex object id
    pub id: String,
    pub author_time: OffsetDateTime,
}

/// Factory for local worktrees
pub trait Vcs {
    type Checkout: Checkout;

    /// Clone `url` into `path`, creating parent directories as needed
    fn clone_repo(&self, url: &str, path: &Path) -> Result<Self::Checkout>;

    /// Open an existing worktree
    fn open(&self, path: &Path) -> Result<Self::Checkout>;
}

/// An opened worktree.
///
/// Checking out overwrites the working directory in place, so every
/// mutating operation takes `&mut self`: one crawl owns the worktree and
/// only one reference is materialized at a time.
pub trait Checkout {
    fn path(&self) -> &Path;

    /// Update all remote-tracking branches and tags from `origin`
    fn fetch_all(&mut self) -> Result<()>;

    /// Update the remote-tracking ref for a single branch
    fn fetch_branch(&mut self, branch: &str) -> Result<()>;

    /// Force the worktree to `rev` and detach HEAD there
    fn checkout(&mut self, rev: &str) -> Result<()>;

    /// Branch names under `origin`, sorted, without the `HEAD` pointer
    fn remote_branches(&self) -> Result<Vec<String>>;

    fn tags(&self) -> Result<Vec<String>>;

    fn commit(&self, rev: &str) -> Result<Commit>;

    /// Up to `depth` commits starting at `rev` itself, following first
    /// parents (child to parent order)
    fn history(&self, rev: &str, depth: usize) -> Result<Vec<Commit>>;
}
