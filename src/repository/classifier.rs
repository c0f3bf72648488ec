//! Activity classification
//!
//! A repository with no commits in the last two years is stale. Forks get
//! two further checks: a fork whose last push predates its creation never
//! received any work, and a fork whose recent commits all sit inside the
//! first week after creation was abandoned right away.

use time::{Duration, OffsetDateTime};

use super::vcs::Commit;
use crate::model::ActivityStatus;

pub const STALE_AFTER: Duration = Duration::days(2 * 365);
pub const QUICK_FORK_WINDOW: Duration = Duration::weeks(1);

/// Commits inspected for the quick-fork check, head included
pub const HISTORY_WINDOW: usize = 3;

/// Forge-side facts the classifier needs
#[derive(Debug, Clone, Copy)]
pub struct ForkInfo {
    pub is_fork: bool,
    pub created_at: OffsetDateTime,
    pub pushed_at: Option<OffsetDateTime>,
}

/// Assign an activity status.
///
/// `window` holds the head commit followed by up to two first-parent
/// ancestors. Precedence: staleness, then dead-end fork, then quick fork.
pub fn classify(info: &ForkInfo, head: &Commit, window: &[Commit], now: OffsetDateTime) -> ActivityStatus {
    if now - head.author_time > STALE_AFTER {
        return ActivityStatus::NoRecentCommits;
    }

    if info.is_fork {
        if info.pushed_at.is_some_and(|pushed| pushed < info.created_at) {
            return ActivityStatus::DeadEndFork;
        }
        if is_quick_fork(info.created_at, window, now) {
            return ActivityStatus::QuickFork;
        }
    }

    ActivityStatus::Active
}

/// Timestamps in the window are not assumed monotonic; the scan stops at
/// the first commit older than the fork itself.
fn is_quick_fork(created_at: OffsetDateTime, window: &[Commit], now: OffsetDateTime) -> bool {
    let window_end = created_at + QUICK_FORK_WINDOW;
    if window_end > now {
        // too young to judge
        return false;
    }
    for commit in window {
        if commit.author_time > window_end {
            return false;
        }
        if commit.author_time < created_at {
            break;
        }
    }
    true
}
