// Shared test fixtures for integration tests
// Functions here are used across different test files
#![allow(dead_code)]

use git2::{Repository, Signature, Time};
use pkgcrawl::config::Config;
use pkgcrawl::forge::{Forge, Owner, RepoMetadata};
use pkgcrawl::model::Handle;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use time::OffsetDateTime;

pub const REPO_URL: &str = "https://forge.example/owner/project";

/// Create a temporary upstream git repository whose HEAD points at `main`
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().join("upstream");
    let repo = Repository::init(&repo_path).unwrap();

    // Configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    repo.set_head("refs/heads/main").unwrap();

    (dir, repo_path, repo)
}

/// Write files and commit them on the current branch with the current time
pub fn add_commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> git2::Oid {
    add_commit_at(repo, files, message, OffsetDateTime::now_utc())
}

/// Write files and commit them with an explicit author/committer time
pub fn add_commit_at(
    repo: &Repository,
    files: &[(&str, &str)],
    message: &str,
    when: OffsetDateTime,
) -> git2::Oid {
    let sig = Signature::new("Test User", "test@example.com", &Time::new(when.unix_timestamp(), 0)).unwrap();

    let mut index = repo.index().unwrap();
    for (path, content) in files {
        // Write file to working directory
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();

        // Add to index
        index.add_path(Path::new(path)).unwrap();
    }
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    // Get parent commit if exists
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents).unwrap()
}

/// Lightweight tag on the current HEAD commit
pub fn tag_head(repo: &Repository, name: &str) {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.tag_lightweight(name, head.as_object(), false).unwrap();
}

/// Create a branch at HEAD without switching to it
pub fn branch_head(repo: &Repository, name: &str) {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch(name, &head, false).unwrap();
}

/// Metadata for a plain (non-fork) repository cloned from `clone_url`
pub fn metadata(clone_url: &Path, created_at: OffsetDateTime) -> RepoMetadata {
    RepoMetadata {
        name: "project".to_string(),
        full_name: "owner/project".to_string(),
        description: Some("A test project".to_string()),
        html_url: REPO_URL.to_string(),
        clone_url: clone_url.to_str().unwrap().to_string(),
        owner: Owner { login: "owner".to_string() },
        stars: 42,
        forks: 3,
        fork: false,
        created_at,
        pushed_at: Some(created_at),
        default_branch: "main".to_string(),
    }
}

/// Config whose cache lives in `cache` and whose skip list is empty
pub fn config_in(cache: &TempDir) -> Config {
    Config {
        cache_root: cache.path().to_path_buf(),
        skip_list: Vec::new(),
        ..Config::default()
    }
}

/// Forge that always answers with the same metadata and counts requests
pub struct StaticForge {
    pub meta: RepoMetadata,
    pub calls: AtomicUsize,
}

impl StaticForge {
    pub fn new(meta: RepoMetadata) -> Self {
        Self { meta, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Forge for StaticForge {
    async fn repository(&self, _handle: &Handle) -> pkgcrawl::Result<RepoMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.meta.clone())
    }
}

impl Forge for &StaticForge {
    async fn repository(&self, handle: &Handle) -> pkgcrawl::Result<RepoMetadata> {
        (**self).repository(handle).await
    }
}
