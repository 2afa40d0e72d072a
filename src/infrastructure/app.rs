use std::sync::Arc;

use crate::controllers::{
    auth::AuthController, category::CategoryController, entry::EntryController,
    feed::FeedController, health::HealthState, opml::OpmlController, tag::TagController,
    user::UserController,
};
use crate::domain::auth::{AuthService, JwtManager};
use crate::domain::category::CategoryService;
use crate::domain::entry::EntryService;
use crate::domain::feed::FeedService;
use crate::domain::opml::OpmlService;
use crate::domain::sync::{FeedFetcher, Synchronizer, SyncWorker};
use crate::domain::tag::TagService;
use crate::domain::user::UserService;
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::http::{build_router, Controllers};
use crate::infrastructure::repositories::Repositories;

/// The wired application: the HTTP router plus the background
/// synchronizer, which the caller starts and stops.
pub struct App {
    pub router: axum::Router,
    pub synchronizer: Arc<Synchronizer>,
}

impl App {
    pub fn build(
        config: &Config,
        repositories: Repositories,
        fetcher: Arc<dyn FeedFetcher>,
        pool: Option<Arc<DbPool>>,
    ) -> Self {
        // 1. Services
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.access_token_ttl,
            config.refresh_token_ttl,
        ));
        let auth_service = Arc::new(AuthService::new(
            repositories.users.clone(),
            repositories.api_keys.clone(),
            jwt,
        ));
        let category_service = Arc::new(CategoryService::new(
            repositories.categories.clone(),
            repositories.entries.clone(),
        ));
        let feed_service = Arc::new(FeedService::new(
            repositories.feeds.clone(),
            repositories.categories.clone(),
            repositories.entries.clone(),
            fetcher.clone(),
        ));
        let entry_service = Arc::new(EntryService::new(repositories.entries.clone()));
        let tag_service = Arc::new(TagService::new(
            repositories.tags.clone(),
            repositories.entries.clone(),
        ));
        let user_service = Arc::new(UserService::new(repositories.users.clone()));
        let opml_service = Arc::new(OpmlService::new(
            repositories.feeds.clone(),
            repositories.categories.clone(),
        ));

        // 2. Background sync
        let due_interval = chrono::Duration::seconds(config.sync_interval.as_secs() as i64);
        let worker = SyncWorker::new(
            repositories.feeds.clone(),
            repositories.entries.clone(),
            fetcher,
            due_interval,
        )
        .with_retention(config.entry_retention);
        let synchronizer = Arc::new(Synchronizer::new(
            repositories.users.clone(),
            Arc::new(worker),
            config.sync_interval,
            config.max_parallel_users,
        ));

        // 3. Controllers and routes
        let controllers = Controllers {
            auth: Arc::new(AuthController::new(auth_service.clone())),
            category: Arc::new(CategoryController::new(category_service)),
            feed: Arc::new(FeedController::new(feed_service)),
            entry: Arc::new(EntryController::new(entry_service.clone())),
            tag: Arc::new(TagController::new(tag_service, entry_service)),
            user: Arc::new(UserController::new(user_service)),
            opml: Arc::new(OpmlController::new(opml_service)),
        };
        let router = build_router(auth_service, controllers, HealthState { pool });

        Self {
            router,
            synchronizer,
        }
    }
}
