//! Repository crawl coordinator
//!
//! One crawl is a single sequential pipeline: metadata, worktree update,
//! classification, reference selection, then checkout and package walk for
//! each selected reference. Any collaborator failure aborts the crawl and
//! no partial record is produced.

use rustc_hash::FxHashSet;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::classifier::{classify, ForkInfo, HISTORY_WINDOW};
use super::progress::{NoopProgress, ProgressReporter};
use super::readme::find_readme;
use super::selector::select_references;
use super::vcs::{Checkout, Vcs};
use super::walker::PackageWalker;
use crate::config::Config;
use crate::error::{CrawlError, Result};
use crate::forge::{Forge, RepoMetadata};
use crate::inspect::BuildInspector;
use crate::model::{ActivityStatus, Dialect, Handle, RefRecord, RefTarget, RepositoryRecord, VcsKind};
use crate::util::format_date;

#[derive(Debug)]
pub enum CrawlOutcome {
    /// The handle is on the skip list; nothing was fetched
    Skipped(Handle),
    Indexed(Box<RepositoryRecord>),
}

pub struct Crawler<V, F, I> {
    config: Config,
    skip: FxHashSet<String>,
    vcs: V,
    forge: F,
    inspector: I,
    progress: Box<dyn ProgressReporter>,
}

impl<V: Vcs, F: Forge, I: BuildInspector> Crawler<V, F, I> {
    pub fn new(config: Config, vcs: V, forge: F, inspector: I) -> Self {
        let skip = config.skip_list.iter().cloned().collect();
        Self {
            config,
            skip,
            vcs,
            forge,
            inspector,
            progress: Box::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn is_skipped(&self, handle: &Handle) -> bool {
        self.skip.contains(handle.as_str())
    }

    /// Crawl the repository at `url` (its forge web URL)
    pub async fn crawl(&self, url: &str) -> Result<CrawlOutcome> {
        let handle = Handle::from_url(url);
        info!("Indexing {}", handle);

        if self.is_skipped(&handle) {
            info!("  {} is on the skip list", handle);
            return Ok(CrawlOutcome::Skipped(handle));
        }

        let meta = self.forge.repository(&handle).await?;

        // The forge's own URL decides case and suffix, so every spelling of
        // a repository shares one handle, worktree and skip-list entry
        let canonical = Handle::from_url(&meta.html_url);
        if canonical != handle {
            debug!("  {} is canonically {}", handle, canonical);
            if self.is_skipped(&canonical) {
                info!("  {} is on the skip list", canonical);
                return Ok(CrawlOutcome::Skipped(canonical));
            }
        }

        let record = self.index(&canonical, &meta, OffsetDateTime::now_utc())?;
        Ok(CrawlOutcome::Indexed(Box::new(record)))
    }

    /// Everything after the metadata lookup; `now` is the crawl time used
    /// for classification and recorded as `last_crawled`.
    pub fn index(&self, handle: &Handle, meta: &RepoMetadata, now: OffsetDateTime) -> Result<RepositoryRecord> {
        let dialect = Dialect::for_handle(handle, &self.config.distribution_handle);
        let mut checkout = self.ensure_checkout(handle, &meta.clone_url)?;

        let status = self.status(&checkout, meta, now)?;
        info!("  status = {}", status);

        let about = find_readme(checkout.path())?;

        let branches = checkout.remote_branches()?;
        let tags = checkout.tags()?;
        let targets = select_references(&branches, &tags, dialect);
        debug!("  {} branches, {} tags, {} refs selected", branches.len(), tags.len(), targets.len());

        let refs = self.crawl_refs(&mut checkout, handle, meta, dialect, &targets)?;

        Ok(RepositoryRecord {
            name: meta.name.clone(),
            full_name: meta.full_name.clone(),
            vcs: VcsKind::Git,
            description: meta.description.clone(),
            primary_url: meta.html_url.clone(),
            owner: meta.owner.login.clone(),
            created: meta.created_at,
            last_updated: meta.pushed_at,
            last_crawled: now,
            stars: meta.stars,
            forks: meta.forks,
            status,
            about,
            is_fork: meta.fork,
            refs,
        })
    }

    /// Clone on first sight, otherwise fetch into the existing worktree
    fn ensure_checkout(&self, handle: &Handle, clone_url: &str) -> Result<V::Checkout> {
        let path = handle.checkout_path(&self.config.cache_root);
        let exists = path
            .try_exists()
            .map_err(|e| CrawlError::io("stat checkout", &path, e))?;

        if exists {
            info!("  {} exists at {} - fetching", handle, path.display());
            let mut checkout = self.vcs.open(&path)?;
            checkout.fetch_all()?;
            Ok(checkout)
        } else {
            info!("  {} does not exist at {} - cloning", handle, path.display());
            self.vcs.clone_repo(clone_url, &path)
        }
    }

    fn status(&self, checkout: &V::Checkout, meta: &RepoMetadata, now: OffsetDateTime) -> Result<ActivityStatus> {
        let rev = RefTarget::branch(meta.default_branch.as_str()).checkout_rev();
        let head = checkout.commit(&rev)?;
        debug!("  head of {} is {} from {}", rev, head.id, format_date(head.author_time));
        let window = checkout.history(&rev, HISTORY_WINDOW)?;

        let info = ForkInfo {
            is_fork: meta.fork,
            created_at: meta.created_at,
            pushed_at: meta.pushed_at,
        };
        Ok(classify(&info, &head, &window, now))
    }

    fn crawl_refs(
        &self,
        checkout: &mut V::Checkout,
        handle: &Handle,
        meta: &RepoMetadata,
        dialect: Dialect,
        targets: &[RefTarget],
    ) -> Result<Vec<RefRecord>> {
        let pb = self.progress.start("Refs", targets.len() as u64);
        let mut refs = Vec::with_capacity(targets.len());

        for target in targets {
            info!("   ref = {}", target.name);
            pb.set_message(&target.name);

            if target.is_branch() {
                checkout.fetch_branch(&target.name)?;
            }
            checkout.checkout(&target.checkout_rev())?;
            let head = checkout.commit("HEAD")?;

            let walker = PackageWalker::new(checkout.path(), handle, dialect, &self.inspector);
            let packages = walker.walk()?;
            debug!("   {} packages at {}", packages.len(), head.id);

            refs.push(RefRecord {
                name: target.name.clone(),
                is_default_branch: target.is_branch() && target.name == meta.default_branch,
                ref_type: target.kind,
                last_seen_commit: head.id,
                last_updated: head.author_time,
                packages,
            });
            pb.inc(1);
        }

        pb.finish();
        Ok(refs)
    }
}
