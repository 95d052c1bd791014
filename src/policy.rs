//! Filename exclusion rules for the collector.

/// Decides which directory entries are excluded from packaging.
///
/// Matching is by exact basename only: no globbing, no case folding, no
/// path components. A nested file carrying an ignored name is excluded
/// at any depth.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    ignored: Vec<String>,
}

impl PathPolicy {
    /// Build a policy from a fixed set of literal basenames.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: names.into_iter().map(Into::into).collect(),
        }
    }

    /// True iff `base_name` exactly equals one of the ignored names.
    pub fn is_ignored(&self, base_name: &str) -> bool {
        self.ignored.iter().any(|name| name == base_name)
    }
}
