use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Entry counters for a feed, a category or a whole account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Stats {
    pub unread: i64,
    pub read: i64,
    pub saved: i64,
    pub total: i64,
}
