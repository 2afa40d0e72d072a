use chrono::{DateTime, Utc};

use super::FetchedEntry;
use crate::domain::entry::{Entry, EntryRepository};
use crate::domain::id::new_id;
use crate::domain::pagination::Mark;
use crate::domain::shared::{RepositoryError, RepositoryResult};

/// Store the entries of a pulled feed that the user does not have yet.
///
/// Entries are looked up by GUID and inserted in the order given. A GUID
/// that is already stored is skipped, as is a concurrent insert of the same
/// GUID that loses the race on the unique constraint. Items published
/// before `not_before` are ignored, so entries removed by retention are
/// not ingested again. Returns the number of entries created.
pub async fn ingest_entries(
    entry_repo: &dyn EntryRepository,
    user_id: &str,
    feed_id: &str,
    fetched: Vec<FetchedEntry>,
    not_before: Option<DateTime<Utc>>,
) -> RepositoryResult<usize> {
    let now = Utc::now();
    let mut created = 0;

    for item in fetched {
        if item.guid.is_empty() {
            tracing::debug!(feed_id = %feed_id, link = %item.link, "Skipping entry without GUID");
            continue;
        }
        if let (Some(cutoff), Some(published)) = (not_before, item.published) {
            if published < cutoff {
                continue;
            }
        }

        match entry_repo.entry_with_guid(user_id, &item.guid).await {
            Ok(_) => continue,
            Err(RepositoryError::ModelNotFound) => {}
            Err(e) => return Err(e),
        }

        let entry = Entry {
            id: new_id(),
            user_id: user_id.to_string(),
            feed_id: feed_id.to_string(),
            guid: item.guid,
            title: item.title,
            link: item.link,
            author: item.author,
            published: item.published.unwrap_or(now),
            saved: false,
            mark: Mark::Unread,
            created_at: Utc::now(),
        };

        match entry_repo.create(user_id, &entry).await {
            Ok(()) => created += 1,
            Err(RepositoryError::Conflict(_)) => {
                tracing::debug!(feed_id = %feed_id, guid = %entry.guid, "Entry inserted concurrently");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(created)
}
