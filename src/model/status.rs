use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Activity state assigned to a repository on every crawl
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActivityStatus {
    Active,
    /// Fork that was never pushed to after it was created
    DeadEndFork,
    /// Fork whose only commits landed within a week of its creation
    QuickFork,
    /// Default branch head is older than the staleness threshold
    NoRecentCommits,
    /// `NoRecentCommits` with no importers. Derived downstream from import
    /// counts, never assigned by the classifier.
    Inactive,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 5] = [
        ActivityStatus::Active,
        ActivityStatus::DeadEndFork,
        ActivityStatus::QuickFork,
        ActivityStatus::NoRecentCommits,
        ActivityStatus::Inactive,
    ];

    /// Catalog label for this status
    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::Active => "active",
            ActivityStatus::DeadEndFork => "dead-end-fork",
            ActivityStatus::QuickFork => "quick-fork",
            ActivityStatus::NoRecentCommits => "no-recent-commits",
            ActivityStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A label that does not name any variant of the target enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} label: {label:?}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub label: String,
}

impl FromStr for ActivityStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| ParseLabelError {
                kind: "activity status",
                label: s.to_string(),
            })
    }
}

impl Serialize for ActivityStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
