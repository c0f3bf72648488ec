//! Crawler configuration
//!
//! Everything that used to be process-wide state (skip list, the
//! distribution repository, the cache location) is carried here and handed
//! to the crawler when it is built.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Repositories that are never crawled
const DEFAULT_SKIP_LIST: &[&str] = &[
    // slide deck
    "github.com/GoesToEleven/GolangTraining",
    "github.com/golang/go",
    // contains a .go file without a package clause
    "github.com/qiniu/gobook",
    // a book
    "github.com/adonovan/gopl.io",
    "github.com/aws/aws-sdk-go",
];

pub const DEFAULT_DISTRIBUTION_HANDLE: &str = "github.com/golang/go";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worktrees live under `<cache_root>/repos/<handle>`
    pub cache_root: PathBuf,
    pub skip_list: Vec<String>,
    /// Handle of the language distribution repository, crawled with its
    /// own tag and layout conventions
    pub distribution_handle: String,
    pub forge: ForgeConfig,
}

impl Default for Config {
    fn default() -> Self {
        let cache_root = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("pkgcrawl");
        Self {
            cache_root,
            skip_list: DEFAULT_SKIP_LIST.iter().map(|s| s.to_string()).collect(),
            distribution_handle: DEFAULT_DISTRIBUTION_HANDLE.to_string(),
            forge: ForgeConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
