mod classifier;
mod crawler;
mod git;
mod progress;
mod readme;
mod selector;
mod vcs;
mod walker;

pub use classifier::{classify, ForkInfo, HISTORY_WINDOW, QUICK_FORK_WINDOW, STALE_AFTER};
pub use crawler::{CrawlOutcome, Crawler};
pub use git::{GitBackend, GitCheckout};
pub use progress::{BarProgress, NoopProgress, ProgressHandle, ProgressReporter};
pub use readme::find_readme;
pub use selector::{select_references, MAX_TAGS};
pub use vcs::{Checkout, Commit, Vcs};
pub use walker::PackageWalker;
