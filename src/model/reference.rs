use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Branch,
    Tag,
}

/// A branch or tag selected for checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefTarget {
    pub name: String,
    pub kind: RefKind,
}

impl RefTarget {
    pub fn branch(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: RefKind::Branch }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: RefKind::Tag }
    }

    pub fn is_branch(&self) -> bool {
        self.kind == RefKind::Branch
    }

    /// Revision to check out: branches are read from the remote-tracking ref
    /// so they always reflect the latest fetch.
    pub fn checkout_rev(&self) -> String {
        match self.kind {
            RefKind::Branch => format!("origin/{}", self.name),
            RefKind::Tag => self.name.clone(),
        }
    }
}
