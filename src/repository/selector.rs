//! Reference selection
//!
//! Branches are always crawled. Release tags are crawled in ascending
//! version order so consecutive checkouts stay close to each other and the
//! worktree changes as little as possible between them.

use crate::model::{Dialect, RefTarget, Version};

/// Maximum number of tags checked out per crawl
pub const MAX_TAGS: usize = 3;

/// Build the ordered checkout list: every branch in enumeration order, then
/// the `MAX_TAGS` lowest version tags in ascending order.
pub fn select_references(branches: &[String], tags: &[String], dialect: Dialect) -> Vec<RefTarget> {
    let mut refs: Vec<RefTarget> = branches
        .iter()
        .filter(|name| name.as_str() != "HEAD")
        .map(|name| RefTarget::branch(name.as_str()))
        .collect();

    let mut versions: Vec<(Version, &str)> = tags
        .iter()
        .filter_map(|tag| Version::parse(tag, dialect).map(|v| (v, tag.as_str())))
        .collect();
    versions.sort_by(|a, b| a.0.cmp(&b.0));

    refs.extend(
        versions
            .into_iter()
            .take(MAX_TAGS)
            .map(|(_, tag)| RefTarget::tag(tag)),
    );
    refs
}
