//! Behaviour every `Repositories` backend must share. Each function sets up
//! its own users, so the suites can run against a fresh or a reused store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use feedhub::domain::category::Category;
use feedhub::domain::entry::Entry;
use feedhub::domain::feed::Feed;
use feedhub::domain::id::new_id;
use feedhub::domain::pagination::{Mark, Marker, Page};
use feedhub::domain::shared::{RepositoryError, Stats};
use feedhub::domain::tag::Tag;
use feedhub::domain::user::User;
use feedhub::infrastructure::repositories::Repositories;
use pretty_assertions::assert_eq;

async fn user(repos: &Repositories, name: &str) -> User {
    let user = User {
        id: new_id(),
        username: format!("{}-{}", name, new_id()),
        password_hash: "hash".to_string(),
        password_salt: "salt".to_string(),
        created_at: Utc::now(),
    };
    repos.users.create(&user).await.unwrap();
    user
}

async fn feed(repos: &Repositories, user: &User, category: Option<&Category>) -> Feed {
    let mut feed = Feed::new(&user.id, &format!("http://example.com/{}.xml", new_id()), "feed");
    feed.category_id = category.map(|c| c.id.clone());
    repos.feeds.create(&user.id, &feed).await.unwrap();
    feed
}

async fn category(repos: &Repositories, user: &User, name: &str) -> Category {
    let category = Category::new(&user.id, name);
    repos.categories.create(&user.id, &category).await.unwrap();
    category
}

fn published(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
}

fn entry(feed: &Feed, guid: &str, minute: i64) -> Entry {
    Entry {
        id: new_id(),
        user_id: feed.user_id.clone(),
        feed_id: feed.id.clone(),
        guid: guid.to_string(),
        title: format!("entry {}", guid),
        link: format!("http://example.com/{}", guid),
        author: String::new(),
        published: published(minute),
        saved: false,
        mark: Mark::Unread,
        created_at: Utc::now(),
    }
}

async fn entries(repos: &Repositories, feed: &Feed, prefix: &str, n: i64) -> Vec<Entry> {
    let mut created = Vec::new();
    for i in 0..n {
        let entry = entry(feed, &format!("{}-{}", prefix, i), i);
        repos.entries.create(&feed.user_id, &entry).await.unwrap();
        created.push(entry);
    }
    created
}

fn not_found<T: std::fmt::Debug>(result: Result<T, RepositoryError>) {
    assert!(
        matches!(result, Err(RepositoryError::ModelNotFound)),
        "expected ModelNotFound, got {:?}",
        result
    );
}

pub async fn resources_are_isolated_per_user(repos: Repositories) {
    let owner = user(&repos, "owner").await;
    let other = user(&repos, "other").await;
    let category = category(&repos, &owner, "Tech").await;
    let feed = feed(&repos, &owner, Some(&category)).await;
    let owned = entries(&repos, &feed, "iso", 2).await;

    not_found(repos.feeds.feed_with_id(&other.id, &feed.id).await);
    not_found(repos.categories.category_with_id(&other.id, &category.id).await);
    not_found(repos.entries.entry_with_id(&other.id, &owned[0].id).await);
    not_found(repos.feeds.delete(&other.id, &feed.id).await);
    not_found(repos.entries.mark(&other.id, &owned[0].id, Mark::Read).await);

    // Another user may not place a feed into a category it does not own.
    let mut foreign = Feed::new(&other.id, "http://example.com/other.xml", "");
    foreign.category_id = Some(category.id.clone());
    not_found(repos.feeds.create(&other.id, &foreign).await);

    let listing = repos.entries.list(&other.id, &Page::default()).await.unwrap();
    assert!(listing.items.is_empty());
    assert_eq!(repos.entries.stats(&other.id).await.unwrap(), Stats::default());

    // Names are unique per user, not globally.
    repos
        .categories
        .create(&other.id, &Category::new(&other.id, "Tech"))
        .await
        .unwrap();
}

pub async fn continuations_visit_every_entry_once(repos: Repositories) {
    let reader = user(&repos, "reader").await;
    let feed = feed(&repos, &reader, None).await;
    let mut expected: Vec<String> = entries(&repos, &feed, "page", 23)
        .await
        .into_iter()
        .map(|e| e.id)
        .collect();
    expected.reverse();

    for count in [1, 5, 23, 50] {
        let mut page = Page::new(count);
        let mut seen = Vec::new();
        loop {
            let listing = repos.entries.list(&reader.id, &page).await.unwrap();
            assert!(listing.items.len() <= count);
            seen.extend(listing.items.into_iter().map(|e| e.id));
            match listing.continuation_id {
                Some(next) => page = page.after(next),
                None => break,
            }
        }
        assert_eq!(seen, expected, "count = {}", count);
    }

    let oldest = repos
        .entries
        .list(&reader.id, &Page::new(1).newest_first(false))
        .await
        .unwrap();
    assert_eq!(oldest.items[0].id, expected[22]);
}

pub async fn marker_filters_listings(repos: Repositories) {
    let reader = user(&repos, "marker").await;
    let feed = feed(&repos, &reader, None).await;
    let created = entries(&repos, &feed, "mark", 4).await;
    repos
        .entries
        .mark(&reader.id, &created[1].id, Mark::Read)
        .await
        .unwrap();

    let read = repos
        .entries
        .list(&reader.id, &Page::default().marked(Marker::Read))
        .await
        .unwrap();
    assert_eq!(read.items.len(), 1);
    assert_eq!(read.items[0].id, created[1].id);

    let unread = repos
        .entries
        .list_from_feed(&reader.id, &Page::default().filtered(&feed.id).marked(Marker::Unread))
        .await
        .unwrap();
    assert_eq!(unread.items.len(), 3);
}

pub async fn feeds_belong_to_at_most_one_category(repos: Repositories) {
    let owner = user(&repos, "mover").await;
    let first = category(&repos, &owner, "First").await;
    let second = category(&repos, &owner, "Second").await;
    let feed = feed(&repos, &owner, Some(&first)).await;

    repos
        .categories
        .add_feeds(&owner.id, &second.id, &[feed.id.clone()])
        .await
        .unwrap();

    let in_first = repos
        .categories
        .feeds(&owner.id, &Page::default().filtered(&first.id))
        .await
        .unwrap();
    assert!(in_first.items.is_empty());
    let in_second = repos
        .categories
        .feeds(&owner.id, &Page::default().filtered(&second.id))
        .await
        .unwrap();
    assert_eq!(in_second.items.len(), 1);

    repos.categories.delete(&owner.id, &second.id).await.unwrap();
    let uncategorized = repos
        .categories
        .uncategorized(&owner.id, &Page::default())
        .await
        .unwrap();
    assert_eq!(uncategorized.items.len(), 1);
    assert_eq!(uncategorized.items[0].category_id, None);

    let duplicate = repos
        .categories
        .create(&owner.id, &Category::new(&owner.id, "FIRST"))
        .await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
}

pub async fn moving_feeds_is_all_or_nothing(repos: Repositories) {
    let owner = user(&repos, "batch").await;
    let stranger = user(&repos, "stranger").await;
    let target = category(&repos, &owner, "Target").await;
    let mine = feed(&repos, &owner, None).await;
    let theirs = feed(&repos, &stranger, None).await;

    for ids in [
        vec![mine.id.clone(), new_id()],
        vec![mine.id.clone(), theirs.id.clone()],
    ] {
        let moved = repos.categories.add_feeds(&owner.id, &target.id, &ids).await;
        assert!(matches!(moved, Err(RepositoryError::ModelNotFound)));
    }

    let in_target = repos
        .categories
        .feeds(&owner.id, &Page::default().filtered(&target.id))
        .await
        .unwrap();
    assert!(in_target.items.is_empty());
    let stored = repos.feeds.feed_with_id(&owner.id, &mine.id).await.unwrap();
    assert_eq!(stored.category_id, None);

    repos
        .categories
        .add_feeds(&owner.id, &target.id, &[mine.id.clone(), mine.id.clone()])
        .await
        .unwrap();
    let stored = repos.feeds.feed_with_id(&owner.id, &mine.id).await.unwrap();
    assert_eq!(stored.category_id, Some(target.id.clone()));
}

pub async fn marking_a_category_marks_its_entries(repos: Repositories) {
    let owner = user(&repos, "cascade").await;
    let news = category(&repos, &owner, "News").await;
    let a = feed(&repos, &owner, Some(&news)).await;
    let b = feed(&repos, &owner, Some(&news)).await;
    let outside = feed(&repos, &owner, None).await;
    entries(&repos, &a, "a", 2).await;
    entries(&repos, &b, "b", 3).await;
    entries(&repos, &outside, "c", 1).await;

    repos
        .categories
        .mark(&owner.id, &news.id, Mark::Read)
        .await
        .unwrap();

    let stats = repos.categories.stats(&owner.id, &news.id).await.unwrap();
    assert_eq!(stats, Stats { unread: 0, read: 5, saved: 0, total: 5 });
    let all = repos.entries.stats(&owner.id).await.unwrap();
    assert_eq!(all, Stats { unread: 1, read: 5, saved: 0, total: 6 });

    repos.feeds.mark(&owner.id, &b.id, Mark::Unread).await.unwrap();
    let stats = repos.feeds.stats(&owner.id, &b.id).await.unwrap();
    assert_eq!(stats.unread, 3);
}

pub async fn tag_listings_return_each_entry_once(repos: Repositories) {
    let owner = user(&repos, "tagger").await;
    let feed = feed(&repos, &owner, None).await;
    let created = entries(&repos, &feed, "tag", 3).await;
    let red = Tag::new(&owner.id, "red");
    let blue = Tag::new(&owner.id, "blue");
    repos.tags.create(&owner.id, &red).await.unwrap();
    repos.tags.create(&owner.id, &blue).await.unwrap();

    let both = vec![created[0].id.clone(), created[1].id.clone()];
    repos.entries.tag_entries(&owner.id, &red.id, &both).await.unwrap();
    // Re-tagging is a no-op.
    repos.entries.tag_entries(&owner.id, &red.id, &both).await.unwrap();
    repos
        .entries
        .tag_entries(&owner.id, &blue.id, &[created[1].id.clone()])
        .await
        .unwrap();

    let tagged = repos
        .entries
        .list_from_tags(&owner.id, &[red.id.clone(), blue.id.clone()], &Page::default())
        .await
        .unwrap();
    let ids: Vec<String> = tagged.items.into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![created[1].id.clone(), created[0].id.clone()]);

    repos.tags.delete(&owner.id, &red.id).await.unwrap();
    let remaining = repos
        .entries
        .list_from_tags(&owner.id, &[red.id.clone(), blue.id.clone()], &Page::default())
        .await
        .unwrap();
    assert_eq!(remaining.items.len(), 1);

    let duplicate = repos.tags.create(&owner.id, &Tag::new(&owner.id, "blue")).await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
}

pub async fn duplicate_guids_conflict(repos: Repositories) {
    let owner = user(&repos, "guid").await;
    let feed = feed(&repos, &owner, None).await;
    let first = entry(&feed, "same", 0);
    repos.entries.create(&owner.id, &first).await.unwrap();

    let again = repos.entries.create(&owner.id, &entry(&feed, "same", 1)).await;
    assert!(matches!(again, Err(RepositoryError::Conflict(_))));

    let found = repos.entries.entry_with_guid(&owner.id, "same").await.unwrap();
    assert_eq!(found.id, first.id);

    // Entries without a GUID are never de-duplicated.
    repos.entries.create(&owner.id, &entry(&feed, "", 2)).await.unwrap();
    repos.entries.create(&owner.id, &entry(&feed, "", 3)).await.unwrap();
    assert_eq!(repos.feeds.stats(&owner.id, &feed.id).await.unwrap().total, 3);
}

pub async fn retention_keeps_saved_entries(repos: Repositories) {
    let owner = user(&repos, "retention").await;
    let feed = feed(&repos, &owner, None).await;
    let created = entries(&repos, &feed, "old", 5).await;
    repos
        .entries
        .set_saved(&owner.id, &created[0].id, true)
        .await
        .unwrap();

    let deleted = repos
        .entries
        .delete_old_entries(&owner.id, published(3))
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let left = repos.feeds.stats(&owner.id, &feed.id).await.unwrap();
    assert_eq!(left, Stats { unread: 3, read: 0, saved: 1, total: 3 });
}

pub async fn deleting_a_user_removes_everything_it_owns(repos: Repositories) {
    let owner = user(&repos, "leaving").await;
    let category = category(&repos, &owner, "Gone").await;
    let feed = feed(&repos, &owner, Some(&category)).await;
    let created = entries(&repos, &feed, "gone", 2).await;
    let tag = Tag::new(&owner.id, "gone");
    repos.tags.create(&owner.id, &tag).await.unwrap();

    repos.users.delete(&owner.id).await.unwrap();

    not_found(repos.users.user_with_id(&owner.id).await);
    not_found(repos.users.user_with_name(&owner.username).await);
    not_found(repos.feeds.feed_with_id(&owner.id, &feed.id).await);
    not_found(repos.categories.category_with_id(&owner.id, &category.id).await);
    not_found(repos.entries.entry_with_id(&owner.id, &created[0].id).await);
    not_found(repos.tags.tag_with_id(&owner.id, &tag.id).await);
    not_found(repos.users.delete(&owner.id).await);
}
