//! git2-backed implementation of the version-control seam

use std::fs;
use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{AutotagOption, BranchType, ErrorCode, FetchOptions, Repository};
use time::OffsetDateTime;

use super::vcs::{Checkout, Commit, Vcs};
use crate::error::{CrawlError, Result};

const REMOTE: &str = "origin";

/// Opens and clones worktrees with libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct GitBackend;

impl Vcs for GitBackend {
    type Checkout = GitCheckout;

    fn clone_repo(&self, url: &str, path: &Path) -> Result<GitCheckout> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CrawlError::io("create clone directory", parent, e))?;
        }
        let repo = RepoBuilder::new()
            .clone(url, path)
            .map_err(|e| CrawlError::git("clone", path, e))?;
        Ok(GitCheckout { repo, path: path.to_path_buf() })
    }

    fn open(&self, path: &Path) -> Result<GitCheckout> {
        let repo = Repository::open(path).map_err(|e| CrawlError::git("open", path, e))?;
        Ok(GitCheckout { repo, path: path.to_path_buf() })
    }
}

/// A libgit2 repository with a working directory
pub struct GitCheckout {
    repo: Repository,
    path: PathBuf,
}

impl GitCheckout {
    fn find_commit(&self, rev: &str) -> Result<git2::Commit<'_>> {
        self.repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| match e.code() {
                ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous => {
                    CrawlError::MissingRevision { rev: rev.to_string(), path: self.path.clone() }
                }
                _ => CrawlError::git("rev-parse", &self.path, e),
            })
    }

    fn fetch(&self, refspecs: &[String], opts: Option<&mut FetchOptions<'_>>) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(REMOTE)
            .map_err(|e| CrawlError::git("find remote", &self.path, e))?;
        remote
            .fetch(refspecs, opts, None)
            .map_err(|e| CrawlError::git("fetch", &self.path, e))
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Result<Commit> {
    let id = commit.id().to_string();
    let seconds = commit.author().when().seconds();
    let author_time = OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|_| CrawlError::InvalidTimestamp { id: id.clone(), seconds })?;
    Ok(Commit { id, author_time })
}

impl Checkout for GitCheckout {
    fn path(&self) -> &Path {
        &self.path
    }

    fn fetch_all(&mut self) -> Result<()> {
        let mut opts = FetchOptions::new();
        opts.download_tags(AutotagOption::All);
        // No explicit refspecs: use the remote's configured ones
        self.fetch(&[], Some(&mut opts))
    }

    fn fetch_branch(&mut self, branch: &str) -> Result<()> {
        let refspec = format!("+refs/heads/{branch}:refs/remotes/{REMOTE}/{branch}");
        self.fetch(&[refspec], None)
    }

    fn checkout(&mut self, rev: &str) -> Result<()> {
        let commit = self.find_commit(rev)?;
        let mut builder = CheckoutBuilder::new();
        builder.force();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut builder))
            .map_err(|e| CrawlError::git("checkout", &self.path, e))?;
        self.repo
            .set_head_detached(commit.id())
            .map_err(|e| CrawlError::git("detach HEAD", &self.path, e))
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        let branches = self
            .repo
            .branches(Some(BranchType::Remote))
            .map_err(|e| CrawlError::git("list branches", &self.path, e))?;

        let prefix = format!("{REMOTE}/");
        let mut names = Vec::new();
        for entry in branches {
            let (branch, _) = entry.map_err(|e| CrawlError::git("list branches", &self.path, e))?;
            let name = branch
                .name()
                .map_err(|e| CrawlError::git("read branch name", &self.path, e))?;
            let Some(short) = name.and_then(|n| n.strip_prefix(prefix.as_str())) else {
                continue;
            };
            if short != "HEAD" {
                names.push(short.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn tags(&self) -> Result<Vec<String>> {
        let tags = self
            .repo
            .tag_names(None)
            .map_err(|e| CrawlError::git("list tags", &self.path, e))?;
        Ok(tags.iter().flatten().map(String::from).collect())
    }

    fn commit(&self, rev: &str) -> Result<Commit> {
        to_commit(&self.find_commit(rev)?)
    }

    fn history(&self, rev: &str, depth: usize) -> Result<Vec<Commit>> {
        let mut commits = Vec::with_capacity(depth);
        if depth == 0 {
            return Ok(commits);
        }

        let mut current = self.find_commit(rev)?;
        loop {
            commits.push(to_commit(&current)?);
            if commits.len() >= depth || current.parent_count() == 0 {
                break;
            }
            current = current
                .parent(0)
                .map_err(|e| CrawlError::git("read parent", &self.path, e))?;
        }
        Ok(commits)
    }
}
