use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::Dialect;

static GENERIC_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?[0-9]+(?:\.[0-9]+)*$").expect("valid tag pattern"));

static DISTRIBUTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^go[0-9]+(?:\.[0-9]+)*$").expect("valid tag pattern"));

const DISTRIBUTION_PREFIX: &str = "go";

/// Numeric, dot-separated version parsed from a release tag.
///
/// Ordering compares components numerically, padding the shorter sequence
/// with zeros, so `1.2` and `1.2.0` are equal and `1.10.0` sorts after
/// `1.9.0`.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a tag in the given dialect. Tags that do not match the
    /// dialect's pattern are not versions and yield `None`.
    pub fn parse(tag: &str, dialect: Dialect) -> Option<Self> {
        let digits = match dialect {
            Dialect::Generic => {
                if !GENERIC_TAG.is_match(tag) {
                    return None;
                }
                tag.strip_prefix('v').unwrap_or(tag)
            }
            Dialect::Distribution => {
                if !DISTRIBUTION_TAG.is_match(tag) {
                    return None;
                }
                tag.strip_prefix(DISTRIBUTION_PREFIX)?
            }
        };

        let components = digits
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self { components })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
