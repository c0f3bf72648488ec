//! Forge metadata seam

mod github;

pub use github::GitHubForge;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::Result;
use crate::model::Handle;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Repository facts reported by the forge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub owner: Owner,
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
    #[serde(rename = "forks_count")]
    pub forks: u64,
    pub fork: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Absent for repositories that were never pushed to
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub pushed_at: Option<OffsetDateTime>,
    pub default_branch: String,
}

/// Source of repository metadata
#[allow(async_fn_in_trait)]
pub trait Forge {
    async fn repository(&self, handle: &Handle) -> Result<RepoMetadata>;
}
