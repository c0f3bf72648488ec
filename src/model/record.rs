use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use time::OffsetDateTime;

use super::{ActivityStatus, Package, ParseLabelError, RefKind};

/// Version control system hosting a repository
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VcsKind {
    Git,
    Hg,
    Svn,
    Bzr,
}

impl VcsKind {
    pub const ALL: [VcsKind; 4] = [VcsKind::Git, VcsKind::Hg, VcsKind::Svn, VcsKind::Bzr];

    pub fn label(self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Svn => "svn",
            VcsKind::Bzr => "bzr",
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VcsKind {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VcsKind::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| ParseLabelError {
                kind: "vcs",
                label: s.to_string(),
            })
    }
}

impl Serialize for VcsKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// README content found at the repository root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct About {
    pub content: String,
    pub content_type: &'static str,
}

/// A reference after it has been checked out and walked
#[derive(Debug, Clone, Serialize)]
pub struct RefRecord {
    pub name: String,
    pub is_default_branch: bool,
    pub ref_type: RefKind,
    pub last_seen_commit: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    pub packages: Vec<Package>,
}

/// Catalog document for one crawled repository
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub full_name: String,
    pub vcs: VcsKind,
    pub description: Option<String>,
    pub primary_url: String,
    pub owner: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_crawled: OffsetDateTime,
    pub stars: u64,
    pub forks: u64,
    pub status: ActivityStatus,
    pub about: Option<About>,
    pub is_fork: bool,
    pub refs: Vec<RefRecord>,
}

impl RepositoryRecord {
    pub fn package_count(&self) -> usize {
        self.refs.iter().map(|r| r.packages.len()).sum()
    }
}
