pub mod memory;
pub mod postgres;

use std::sync::Arc;

use crate::domain::auth::ApiKeyRepository;
use crate::domain::category::CategoryRepository;
use crate::domain::entry::EntryRepository;
use crate::domain::feed::FeedRepository;
use crate::domain::tag::TagRepository;
use crate::domain::user::UserRepository;
use crate::infrastructure::db::DbPool;

/// One implementation of every repository, backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub feeds: Arc<dyn FeedRepository>,
    pub entries: Arc<dyn EntryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<DbPool>) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pool.clone())),
            categories: Arc::new(postgres::PgCategoryRepository::new(pool.clone())),
            feeds: Arc::new(postgres::PgFeedRepository::new(pool.clone())),
            entries: Arc::new(postgres::PgEntryRepository::new(pool.clone())),
            tags: Arc::new(postgres::PgTagRepository::new(pool.clone())),
            api_keys: Arc::new(postgres::PgApiKeyRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = memory::new_store();
        Self {
            users: Arc::new(memory::MemoryUserRepository::new(store.clone())),
            categories: Arc::new(memory::MemoryCategoryRepository::new(store.clone())),
            feeds: Arc::new(memory::MemoryFeedRepository::new(store.clone())),
            entries: Arc::new(memory::MemoryEntryRepository::new(store.clone())),
            tags: Arc::new(memory::MemoryTagRepository::new(store.clone())),
            api_keys: Arc::new(memory::MemoryApiKeyRepository::new(store)),
        }
    }
}
