//! Periodic feed synchronization.
//!
//! [`Synchronizer`] owns the ticker and fans users out to a bounded pool of
//! tasks; each user is handled by [`SyncWorker`], which pulls the user's due
//! feeds one after another through a [`FeedFetcher`] and stores new entries
//! with [`ingest_entries`].

pub mod fetcher;
pub mod ingest;
pub mod scheduler;
pub mod worker;

pub use fetcher::{FeedDescriptor, FeedFetcher, FetchError, FetchedEntry, PullOutcome, PulledFeed};
pub use ingest::ingest_entries;
pub use scheduler::{Synchronizer, UserSyncer, DEFAULT_MAX_PARALLEL_USERS};
pub use worker::{FeedSync, SyncError, SyncReport, SyncWorker, FEED_PAGE_SIZE};
