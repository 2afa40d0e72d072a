use chrono::{DateTime, Utc};
use feed_rs::parser;
use sha2::{Digest, Sha256};

use crate::domain::sync::{FetchError, FetchedEntry};

/// Feed-level fields of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub title: String,
    pub description: String,
    pub source: String,
    pub entries: Vec<FetchedEntry>,
}

/// Parse an RSS or Atom document; the format is detected from the content.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, FetchError> {
    let feed = parser::parse(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let published = entry.published.or(entry.updated);
            let author = entry
                .authors
                .into_iter()
                .map(|p| p.name)
                .find(|name| !name.trim().is_empty())
                .unwrap_or_default();
            let guid = generate_guid(&entry.id, &link, &title, published);

            FetchedEntry {
                guid,
                title,
                link,
                author,
                published,
            }
        })
        .collect();

    Ok(ParsedFeed {
        title: feed.title.map(|t| t.content).unwrap_or_default(),
        description: feed.description.map(|t| t.content).unwrap_or_default(),
        source: feed.links.first().map(|l| l.href.clone()).unwrap_or_default(),
        entries,
    })
}

/// Keep the upstream id; without one, derive a stable id from the item's
/// link, title and publication time.
fn generate_guid(
    existing: &str,
    link: &str,
    title: &str,
    published: Option<DateTime<Utc>>,
) -> String {
    let trimmed = existing.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    let input = format!(
        "{}|{}|{}",
        link,
        title,
        published.map(|p| p.timestamp().to_string()).unwrap_or_default()
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
