use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    auth::AuthController, category::CategoryController, entry::EntryController,
    feed::FeedController, health, health::HealthState, opml::OpmlController, tag::TagController,
    user::UserController,
};
use crate::domain::auth::AuthService;
use crate::infrastructure::auth::{auth_middleware, request_id_middleware};

/// Every controller the router dispatches to.
pub struct Controllers {
    pub auth: Arc<AuthController>,
    pub category: Arc<CategoryController>,
    pub feed: Arc<FeedController>,
    pub entry: Arc<EntryController>,
    pub tag: Arc<TagController>,
    pub user: Arc<UserController>,
    pub opml: Arc<OpmlController>,
}

/// Build the `/v1` API. Everything except auth and health requires a
/// bearer access token.
pub fn build_router(
    auth_service: Arc<AuthService>,
    controllers: Controllers,
    health_state: HealthState,
) -> Router {
    // Public
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state);

    let auth_routes = Router::new()
        .route("/auth/register", post(AuthController::register))
        .route("/auth/login", post(AuthController::login))
        .route("/auth/renew", post(AuthController::renew))
        .with_state(controllers.auth);

    // Authenticated
    let category_routes = Router::new()
        .route(
            "/categories",
            get(CategoryController::list_categories).post(CategoryController::create_category),
        )
        .route(
            "/categories/:id",
            get(CategoryController::get_category)
                .put(CategoryController::rename_category)
                .delete(CategoryController::delete_category),
        )
        .route(
            "/categories/:id/feeds",
            get(CategoryController::list_feeds).put(CategoryController::add_feeds),
        )
        .route("/categories/:id/entries", get(CategoryController::list_entries))
        .route("/categories/:id/mark", put(CategoryController::mark_category))
        .route("/categories/:id/stats", get(CategoryController::category_stats))
        .with_state(controllers.category)
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ));

    let feed_routes = Router::new()
        .route("/feeds", get(FeedController::list_feeds).post(FeedController::create_feed))
        .route("/feeds/uncategorized", get(FeedController::list_uncategorized))
        .route(
            "/feeds/:id",
            get(FeedController::get_feed)
                .put(FeedController::update_feed)
                .delete(FeedController::delete_feed),
        )
        .route("/feeds/:id/entries", get(FeedController::list_entries))
        .route("/feeds/:id/mark", put(FeedController::mark_feed))
        .route("/feeds/:id/stats", get(FeedController::feed_stats))
        .with_state(controllers.feed)
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ));

    let entry_routes = Router::new()
        .route("/entries", get(EntryController::list_entries))
        .route("/entries/mark", put(EntryController::mark_all))
        .route("/entries/stats", get(EntryController::entry_stats))
        .route("/entries/:id", get(EntryController::get_entry))
        .route("/entries/:id/mark", put(EntryController::mark_entry))
        .route("/entries/:id/saved", put(EntryController::set_saved))
        .with_state(controllers.entry)
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ));

    let tag_routes = Router::new()
        .route("/tags", get(TagController::list_tags).post(TagController::create_tag))
        .route("/tags/entries", get(TagController::list_tagged))
        .route(
            "/tags/:id",
            get(TagController::get_tag)
                .put(TagController::rename_tag)
                .delete(TagController::delete_tag),
        )
        .route(
            "/tags/:id/entries",
            get(TagController::list_entries).put(TagController::tag_entries),
        )
        .with_state(controllers.tag)
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ));

    let user_routes = Router::new()
        .route("/users", get(UserController::get_me).delete(UserController::delete_me))
        .with_state(controllers.user)
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ));

    let opml_routes = Router::new()
        .route("/opml", get(OpmlController::export).post(OpmlController::import))
        .with_state(controllers.opml)
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(category_routes)
        .merge(feed_routes)
        .merge(entry_routes)
        .merge(tag_routes)
        .merge(user_routes)
        .merge(opml_routes);

    Router::new()
        .nest("/v1", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    tracing::info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
