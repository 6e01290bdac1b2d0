//! Field-level merge policies applied when an incoming record matches a stored one

/// How a stored field reacts to an incoming observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// First confirmed value stays; incoming only fills a gap
    Protected,
    /// Latest non-null observation wins; nulls never erase
    Descriptive,
}

impl MergePolicy {
    pub fn merge<T>(self, existing: Option<T>, incoming: Option<T>) -> Option<T> {
        match self {
            MergePolicy::Protected => existing.or(incoming),
            MergePolicy::Descriptive => incoming.or(existing),
        }
    }
}
