// End-to-end crawl tests against local upstream repositories
mod common;

use common::*;
use pkgcrawl::forge::RepoMetadata;
use pkgcrawl::inspect::GoInspector;
use pkgcrawl::model::{ActivityStatus, Handle, RefKind, RepositoryRecord};
use pkgcrawl::repository::{Checkout, Commit, CrawlOutcome, Crawler, GitBackend, GitCheckout, Vcs};
use pkgcrawl::CrawlError;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

fn indexed(outcome: CrawlOutcome) -> RepositoryRecord {
    match outcome {
        CrawlOutcome::Indexed(record) => *record,
        CrawlOutcome::Skipped(handle) => panic!("{handle} was skipped"),
    }
}

fn ref_names(record: &RepositoryRecord) -> Vec<&str> {
    record.refs.iter().map(|r| r.name.as_str()).collect()
}

/// Upstream with two branches and a spread of tags
fn populated_upstream() -> (TempDir, std::path::PathBuf, git2::Repository) {
    let (dir, path, repo) = create_test_repo();
    add_commit(
        &repo,
        &[
            ("README.md", "# project\n"),
            ("pkg/a/a.go", "// Package a does a.\npackage a\n\nimport \"fmt\"\n"),
            ("pkg/a/a_test.go", "package a\n\nimport \"testing\"\n"),
            ("vendor/x/x.go", "package x\n"),
            ("internal/y/y.go", "package y\n"),
        ],
        "Initial commit",
    );
    tag_head(&repo, "v1.0.0");
    add_commit(&repo, &[("pkg/b/b.go", "package b\n")], "Add b");
    tag_head(&repo, "v1.1.0");
    tag_head(&repo, "nightly");
    add_commit(&repo, &[("pkg/b/more.go", "package b\n")], "More b");
    tag_head(&repo, "v1.2.0");
    add_commit(&repo, &[("cmd/tool/main.go", "package main\n")], "Add tool");
    tag_head(&repo, "v2.0.0");
    branch_head(&repo, "dev");
    (dir, path, repo)
}

#[tokio::test]
async fn test_crawl_indexes_branches_and_lowest_tags() {
    let (_dir, upstream_path, _upstream) = populated_upstream();
    let cache = TempDir::new().unwrap();
    let forge = StaticForge::new(metadata(&upstream_path, OffsetDateTime::now_utc() - Duration::days(30)));
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let record = indexed(crawler.crawl(REPO_URL).await.unwrap());

    assert_eq!(forge.calls(), 1);
    assert_eq!(record.full_name, "owner/project");
    assert_eq!(record.owner, "owner");
    assert_eq!(record.stars, 42);
    assert_eq!(record.status, ActivityStatus::Active);
    assert_eq!(record.about.as_ref().unwrap().content, "# project\n");
    assert_eq!(ref_names(&record), vec!["dev", "main", "v1.0.0", "v1.1.0", "v1.2.0"]);

    let main = &record.refs[1];
    assert!(main.is_default_branch);
    assert_eq!(main.ref_type, RefKind::Branch);
    assert!(!record.refs[0].is_default_branch);
    assert!(record.refs[2..].iter().all(|r| r.ref_type == RefKind::Tag && !r.is_default_branch));

    let main_paths: Vec<&str> = main.packages.iter().map(|p| p.import_path.as_str()).collect();
    assert_eq!(
        main_paths,
        vec![
            "forge.example/owner/project/cmd/tool",
            "forge.example/owner/project/pkg/a",
            "forge.example/owner/project/pkg/b",
        ]
    );
    assert!(main.packages[0].is_command);
    assert_eq!(main.packages[1].synopsis, "Package a does a.");
    assert_eq!(main.packages[1].imports, vec!["fmt"]);
    assert_eq!(main.packages[1].test_imports, vec!["testing"]);

    // each tag is walked at its own commit
    let v100 = &record.refs[2];
    assert_eq!(v100.packages.len(), 1);
    assert_eq!(v100.packages[0].import_path, "forge.example/owner/project/pkg/a");
    assert_eq!(record.refs[3].packages.len(), 2);
    assert_ne!(v100.last_seen_commit, main.last_seen_commit);
    assert_eq!(record.refs[4].packages[1].files, vec!["b.go", "more.go"]);

    assert!(cache.path().join("repos/forge.example/owner/project/.git").exists());
}

#[tokio::test]
async fn test_skip_list_short_circuits() {
    let (_dir, upstream_path, _upstream) = populated_upstream();
    let cache = TempDir::new().unwrap();
    let mut config = config_in(&cache);
    config.skip_list = vec!["forge.example/owner/project".to_string()];
    let forge = StaticForge::new(metadata(&upstream_path, OffsetDateTime::now_utc()));
    let crawler = Crawler::new(config, GitBackend, &forge, GoInspector::new());

    let outcome = crawler.crawl(&format!("{REPO_URL}/")).await.unwrap();

    match outcome {
        CrawlOutcome::Skipped(handle) => assert_eq!(handle, Handle::from_url(REPO_URL)),
        CrawlOutcome::Indexed(_) => panic!("skipped repository was indexed"),
    }
    assert_eq!(forge.calls(), 0);
    assert!(!cache.path().join("repos").exists());
}

#[tokio::test]
async fn test_second_crawl_fetches_existing_worktree() {
    let (_dir, upstream_path, upstream) = populated_upstream();
    let cache = TempDir::new().unwrap();
    let forge = StaticForge::new(metadata(&upstream_path, OffsetDateTime::now_utc() - Duration::days(30)));
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let first = indexed(crawler.crawl(REPO_URL).await.unwrap());

    let newest = add_commit(&upstream, &[("pkg/c/c.go", "package c\n")], "Add c");
    tag_head(&upstream, "v0.9.0");

    let second = indexed(crawler.crawl(REPO_URL).await.unwrap());
    assert_eq!(forge.calls(), 2);
    assert_eq!(ref_names(&second), vec!["dev", "main", "v0.9.0", "v1.0.0", "v1.1.0"]);

    let main = &second.refs[1];
    assert_eq!(main.last_seen_commit, newest.to_string());
    assert_ne!(main.last_seen_commit, first.refs[1].last_seen_commit);
    assert_eq!(main.packages.len(), 4);
    // dev did not move upstream
    assert_eq!(second.refs[0].last_seen_commit, first.refs[0].last_seen_commit);
}

#[tokio::test]
async fn test_missing_default_branch_aborts_crawl() {
    let (_dir, upstream_path, _upstream) = populated_upstream();
    let cache = TempDir::new().unwrap();
    let mut meta = metadata(&upstream_path, OffsetDateTime::now_utc());
    meta.default_branch = "trunk".to_string();
    let forge = StaticForge::new(meta);
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let err = crawler.crawl(REPO_URL).await.unwrap_err();
    assert!(matches!(err, CrawlError::MissingRevision { ref rev, .. } if rev == "origin/trunk"));
}

#[tokio::test]
async fn test_unreachable_clone_url_aborts_crawl() {
    let cache = TempDir::new().unwrap();
    let missing = cache.path().join("no-such-upstream");
    let forge = StaticForge::new(metadata(&missing, OffsetDateTime::now_utc()));
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let err = crawler.crawl(REPO_URL).await.unwrap_err();
    assert!(matches!(err, CrawlError::Git { operation: "clone", .. }));
}

fn fork_metadata(upstream: &Path, created_at: OffsetDateTime, pushed_at: OffsetDateTime) -> RepoMetadata {
    let mut meta = metadata(upstream, created_at);
    meta.fork = true;
    meta.pushed_at = Some(pushed_at);
    meta
}

#[test]
fn test_index_classifies_quick_fork() {
    let created = datetime!(2024-03-01 0:00 UTC);
    let (_dir, upstream_path, upstream) = create_test_repo();
    add_commit_at(&upstream, &[("a.go", "package a\n")], "Upstream work", created - Duration::days(40));
    add_commit_at(&upstream, &[("b.go", "package a\n")], "Fork tweak", created + Duration::hours(2));
    add_commit_at(&upstream, &[("c.go", "package a\n")], "Fork tweak", created + Duration::days(1));

    let cache = TempDir::new().unwrap();
    let meta = fork_metadata(&upstream_path, created, created + Duration::days(1));
    let forge = StaticForge::new(meta.clone());
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let handle = Handle::from_url(REPO_URL);
    let record = crawler.index(&handle, &meta, created + Duration::days(60)).unwrap();
    assert_eq!(record.status, ActivityStatus::QuickFork);
    assert!(record.is_fork);
    assert_eq!(record.last_crawled, created + Duration::days(60));
}

#[test]
fn test_index_classifies_dead_end_fork() {
    let created = datetime!(2024-03-01 0:00 UTC);
    let (_dir, upstream_path, upstream) = create_test_repo();
    add_commit_at(&upstream, &[("a.go", "package a\n")], "Upstream work", created - Duration::days(5));

    let cache = TempDir::new().unwrap();
    let meta = fork_metadata(&upstream_path, created, created - Duration::days(5));
    let forge = StaticForge::new(meta.clone());
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let record = crawler
        .index(&Handle::from_url(REPO_URL), &meta, created + Duration::days(10))
        .unwrap();
    assert_eq!(record.status, ActivityStatus::DeadEndFork);
}

#[test]
fn test_index_classifies_stale_repository() {
    let last = datetime!(2020-01-01 0:00 UTC);
    let (_dir, upstream_path, upstream) = create_test_repo();
    add_commit_at(&upstream, &[("a.go", "package a\n")], "Last work", last);

    let cache = TempDir::new().unwrap();
    let meta = metadata(&upstream_path, last - Duration::days(100));
    let forge = StaticForge::new(meta.clone());
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let record = crawler
        .index(&Handle::from_url(REPO_URL), &meta, last + Duration::days(731))
        .unwrap();
    assert_eq!(record.status, ActivityStatus::NoRecentCommits);
    assert_eq!(ref_names(&record), vec!["main"]);
    assert!(record.about.is_none());
}

#[tokio::test]
async fn test_canonical_url_decides_handle() {
    let (_dir, upstream_path, _upstream) = populated_upstream();
    let cache = TempDir::new().unwrap();
    let forge = StaticForge::new(metadata(&upstream_path, OffsetDateTime::now_utc() - Duration::days(30)));
    let crawler = Crawler::new(config_in(&cache), GitBackend, &forge, GoInspector::new());

    let record = indexed(crawler.crawl("https://forge.example/OWNER/Project.git").await.unwrap());

    let main = &record.refs[1];
    assert_eq!(main.packages[1].import_path, "forge.example/owner/project/pkg/a");
    assert!(cache.path().join("repos/forge.example/owner/project/.git").exists());
    assert!(!cache.path().join("repos/forge.example/OWNER").exists());
}

#[tokio::test]
async fn test_skip_list_applies_to_canonical_handle() {
    let (_dir, upstream_path, _upstream) = populated_upstream();
    let cache = TempDir::new().unwrap();
    let mut config = config_in(&cache);
    config.skip_list = vec!["forge.example/owner/project".to_string()];
    let forge = StaticForge::new(metadata(&upstream_path, OffsetDateTime::now_utc()));
    let crawler = Crawler::new(config, GitBackend, &forge, GoInspector::new());

    let outcome = crawler.crawl("https://forge.example/Owner/PROJECT").await.unwrap();

    match outcome {
        CrawlOutcome::Skipped(handle) => assert_eq!(handle.as_str(), "forge.example/owner/project"),
        CrawlOutcome::Indexed(_) => panic!("skipped repository was indexed"),
    }
    // the lookup is needed to learn the canonical name, nothing more
    assert_eq!(forge.calls(), 1);
    assert!(!cache.path().join("repos").exists());
}

/// Git worktree that loses one tag right before it is checked out, the way
/// a concurrent upstream deletion would
struct VanishingTag {
    inner: GitCheckout,
    tag: &'static str,
    checkouts: Arc<AtomicUsize>,
}

impl Checkout for VanishingTag {
    fn path(&self) -> &Path {
        self.inner.path()
    }

    fn fetch_all(&mut self) -> pkgcrawl::Result<()> {
        self.inner.fetch_all()
    }

    fn fetch_branch(&mut self, branch: &str) -> pkgcrawl::Result<()> {
        self.inner.fetch_branch(branch)
    }

    fn checkout(&mut self, rev: &str) -> pkgcrawl::Result<()> {
        if rev == self.tag {
            let repo = git2::Repository::open(self.inner.path()).unwrap();
            repo.find_reference(&format!("refs/tags/{rev}")).unwrap().delete().unwrap();
        }
        self.inner.checkout(rev)?;
        self.checkouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remote_branches(&self) -> pkgcrawl::Result<Vec<String>> {
        self.inner.remote_branches()
    }

    fn tags(&self) -> pkgcrawl::Result<Vec<String>> {
        self.inner.tags()
    }

    fn commit(&self, rev: &str) -> pkgcrawl::Result<Commit> {
        self.inner.commit(rev)
    }

    fn history(&self, rev: &str, depth: usize) -> pkgcrawl::Result<Vec<Commit>> {
        self.inner.history(rev, depth)
    }
}

struct VanishingTagVcs {
    tag: &'static str,
    checkouts: Arc<AtomicUsize>,
}

impl Vcs for VanishingTagVcs {
    type Checkout = VanishingTag;

    fn clone_repo(&self, url: &str, path: &Path) -> pkgcrawl::Result<VanishingTag> {
        let inner = GitBackend.clone_repo(url, path)?;
        Ok(VanishingTag { inner, tag: self.tag, checkouts: Arc::clone(&self.checkouts) })
    }

    fn open(&self, path: &Path) -> pkgcrawl::Result<VanishingTag> {
        let inner = GitBackend.open(path)?;
        Ok(VanishingTag { inner, tag: self.tag, checkouts: Arc::clone(&self.checkouts) })
    }
}

#[tokio::test]
async fn test_failure_inside_ref_loop_aborts_crawl() {
    let (_dir, upstream_path, _upstream) = populated_upstream();
    let cache = TempDir::new().unwrap();
    let forge = StaticForge::new(metadata(&upstream_path, OffsetDateTime::now_utc() - Duration::days(30)));
    let checkouts = Arc::new(AtomicUsize::new(0));
    let vcs = VanishingTagVcs { tag: "v1.1.0", checkouts: Arc::clone(&checkouts) };
    let crawler = Crawler::new(config_in(&cache), vcs, &forge, GoInspector::new());

    let err = crawler.crawl(REPO_URL).await.unwrap_err();

    assert!(matches!(err, CrawlError::MissingRevision { ref rev, .. } if rev == "v1.1.0"));
    // dev, main and v1.0.0 went through before the failure
    assert_eq!(checkouts.load(Ordering::SeqCst), 3);
}
