use serde::{Deserialize, Serialize};

/// Outcome of an OPML import.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub categories_created: usize,
    pub feeds_created: usize,
    /// Outlines with a missing or invalid URL, or already subscribed.
    pub feeds_skipped: usize,
}
