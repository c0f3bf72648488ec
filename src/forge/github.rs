//! GitHub REST metadata client

use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use super::{Forge, RepoMetadata};
use crate::config::ForgeConfig;
use crate::error::{CrawlError, Result};
use crate::model::Handle;

#[derive(Debug, Clone)]
pub struct GitHubForge {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubForge {
    pub fn new(config: &ForgeConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn repo_url(&self, owner: &str, name: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, owner, name)
    }
}

impl Forge for GitHubForge {
    async fn repository(&self, handle: &Handle) -> Result<RepoMetadata> {
        let (owner, name) = handle
            .owner_and_name()
            .ok_or_else(|| CrawlError::InvalidHandle(handle.to_string()))?;
        let url = self.repo_url(owner, name);
        debug!("GET {}", url);

        let mut request = self.client.get(&url).header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let forge_err = |source| CrawlError::Forge { handle: handle.to_string(), source };
        request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(forge_err)?
            .json::<RepoMetadata>()
            .await
            .map_err(forge_err)
    }
}
