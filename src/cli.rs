use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pkgcrawl", about = "Crawl a forge repository for Go packages")]
pub struct Cli {
    /// Web URL of the repository, e.g. https://github.com/stretchr/testify
    pub repo_url: String,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the cached worktrees (overrides the config file)
    #[arg(long)]
    pub cache_root: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Pretty-print the JSON record
    #[arg(long)]
    pub pretty: bool,
}
