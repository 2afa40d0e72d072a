use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const MAX_PAGE_SIZE: usize = 100;

/// Persisted read state of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Read,
    #[default]
    Unread,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Read => "read",
            Mark::Unread => "unread",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Mark::Read),
            "unread" => Ok(Mark::Unread),
            other => Err(format!("unknown mark '{}'", other)),
        }
    }
}

/// Read-state filter for listings. `Any` selects both persisted values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Read,
    Unread,
    #[default]
    Any,
}

impl Marker {
    pub fn matches(&self, mark: Mark) -> bool {
        match self.as_mark() {
            Some(wanted) => wanted == mark,
            None => true,
        }
    }

    /// The persisted mark this filter selects, or `None` for `Any`.
    pub fn as_mark(&self) -> Option<Mark> {
        match self {
            Marker::Read => Some(Mark::Read),
            Marker::Unread => Some(Mark::Unread),
            Marker::Any => None,
        }
    }
}

impl From<Mark> for Marker {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Read => Marker::Read,
            Mark::Unread => Marker::Unread,
        }
    }
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "" => Ok(Marker::Any),
            other => other.parse::<Mark>().map(Marker::from),
        }
    }
}

/// Cursor-based page request shared by every listing.
///
/// `filter_id` scopes the listing to a parent (a category, a feed or a tag)
/// where the listing supports one. `continuation_id` is the id returned by
/// the previous page; an id that no longer exists restarts the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub filter_id: Option<String>,
    pub continuation_id: Option<String>,
    pub count: usize,
    pub newest: bool,
    pub marker: Marker,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Page {
    pub fn new(count: usize) -> Self {
        Self {
            filter_id: None,
            continuation_id: None,
            count,
            newest: true,
            marker: Marker::Any,
        }
    }

    pub fn filtered(mut self, filter_id: impl Into<String>) -> Self {
        self.filter_id = Some(filter_id.into());
        self
    }

    pub fn after(mut self, continuation_id: impl Into<String>) -> Self {
        let id = continuation_id.into();
        self.continuation_id = if id.is_empty() { None } else { Some(id) };
        self
    }

    pub fn newest_first(mut self, newest: bool) -> Self {
        self.newest = newest;
        self
    }

    pub fn marked(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    /// Number of items to return, never zero.
    pub fn limit(&self) -> usize {
        self.count.max(1)
    }
}

/// One page of results plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_id: Option<String>,
}

impl<T> Listing<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            continuation_id: None,
        }
    }

    /// Build a listing from up to `limit + 1` rows read in listing order.
    /// The extra row, if present, becomes the continuation and is dropped.
    pub fn from_rows(mut rows: Vec<T>, limit: usize, id: impl Fn(&T) -> &str) -> Self {
        let continuation_id = if rows.len() > limit {
            rows.truncate(limit + 1);
            rows.pop().map(|extra| id(&extra).to_string())
        } else {
            None
        };

        Self {
            items: rows,
            continuation_id,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing {
            items: self.items.into_iter().map(f).collect(),
            continuation_id: self.continuation_id,
        }
    }

    pub fn is_last(&self) -> bool {
        self.continuation_id.is_none()
    }
}

/// Slice rows that are already sorted in listing order.
///
/// `cursor` is the sort key of the continuation row, resolved by the caller
/// against the unfiltered table; `None` starts from the beginning. The
/// continuation row itself is the first row of the page. Used by the
/// in-memory repositories; the Postgres ones express the same contract in
/// SQL.
pub fn paginate<T, K: PartialOrd>(
    rows: Vec<T>,
    page: &Page,
    cursor: Option<K>,
    descending: bool,
    key: impl Fn(&T) -> K,
    id: impl Fn(&T) -> &str,
) -> Listing<T> {
    let limit = page.limit();
    let window: Vec<T> = rows
        .into_iter()
        .filter(|row| match &cursor {
            None => true,
            Some(cursor) if descending => key(row) <= *cursor,
            Some(cursor) => key(row) >= *cursor,
        })
        .take(limit + 1)
        .collect();
    Listing::from_rows(window, limit, id)
}
