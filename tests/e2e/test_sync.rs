use crate::e2e::helpers::{self, guids, prefixed_guids, TestContext, TEST_ETAG};

use helpers::assertions::listing_field;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use test_context::test_context;

async fn feed_guids(ctx: &TestContext, token: &str, feed_id: &str) -> Vec<String> {
    let response = ctx
        .client
        .get_with_auth(&format!("/feeds/{}/entries?count=100", feed_id), token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    listing_field(response.json_body(), "guid")
}

async fn get_feed(ctx: &TestContext, token: &str, feed_id: &str) -> Value {
    let response = ctx
        .client
        .get_with_auth(&format!("/feeds/{}", feed_id), token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    response.json_body().clone()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_duplicate_entries_on_resync(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(5)).await;
    let feed = ctx.subscribe(&token, "/rss.xml").await.unwrap();
    let feed_id = feed["id"].as_str().unwrap();
    assert_eq!(feed_guids(ctx, &token, feed_id).await.len(), 5);

    ctx.wait_for_due_interval().await;
    let users = ctx.synchronizer.sync_users().await.unwrap();
    assert_eq!(users, 1);

    assert_eq!(feed_guids(ctx, &token, feed_id).await, guids(5));
    // The second pull did happen.
    assert_eq!(ctx.upstream.received_requests().await.unwrap().len(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_feeds_that_are_not_due(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(2)).await;
    ctx.subscribe(&token, "/rss.xml").await.unwrap();

    ctx.synchronizer.sync_users().await.unwrap();

    assert_eq!(ctx.upstream.received_requests().await.unwrap().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_short_circuit_on_not_modified(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed_with_etag("/rss.xml", &guids(5)).await;
    let feed = ctx.subscribe(&token, "/rss.xml").await.unwrap();
    let feed_id = feed["id"].as_str().unwrap();
    let before = get_feed(ctx, &token, feed_id).await;

    ctx.wait_for_due_interval().await;
    ctx.synchronizer.sync_users().await.unwrap();

    let after = get_feed(ctx, &token, feed_id).await;
    assert_eq!(after["lastUpdated"], before["lastUpdated"]);
    assert_eq!(feed_guids(ctx, &token, feed_id).await.len(), 5);

    let requests = ctx.upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers.get("if-none-match").is_none());
    assert_eq!(
        requests[1]
            .headers
            .get("if-none-match")
            .and_then(|v| v.to_str().ok()),
        Some(TEST_ETAG)
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pick_up_new_items(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(2)).await;
    let feed = ctx.subscribe(&token, "/rss.xml").await.unwrap();
    let feed_id = feed["id"].as_str().unwrap();

    ctx.upstream.reset().await;
    ctx.mount_feed("/rss.xml", &guids(4)).await;
    ctx.wait_for_due_interval().await;
    ctx.synchronizer.sync_users().await.unwrap();

    let mut synced = feed_guids(ctx, &token, feed_id).await;
    synced.sort();
    assert_eq!(synced, guids(4));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_syncing_past_a_failing_feed(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/broken.xml", &prefixed_guids("broken", 1)).await;
    ctx.mount_feed("/fine.xml", &prefixed_guids("fine", 1)).await;
    let broken = ctx.subscribe(&token, "/broken.xml").await.unwrap();
    let fine = ctx.subscribe(&token, "/fine.xml").await.unwrap();

    ctx.upstream.reset().await;
    ctx.mount_feed("/fine.xml", &prefixed_guids("fine", 3)).await;
    ctx.wait_for_due_interval().await;
    ctx.synchronizer.sync_users().await.unwrap();

    // /broken.xml now answers 404 and keeps its single entry.
    assert_eq!(
        feed_guids(ctx, &token, broken["id"].as_str().unwrap()).await.len(),
        1
    );
    assert_eq!(
        feed_guids(ctx, &token, fine["id"].as_str().unwrap()).await.len(),
        3
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_sync_every_user(ctx: &mut TestContext) {
    let mut feeds = Vec::new();
    for name in ["alice", "bobby", "carol"] {
        let token = ctx.login(name).await.unwrap();
        let feed_path = format!("/{}.xml", name);
        ctx.mount_feed(&feed_path, &guids(1)).await;
        let feed = ctx.subscribe(&token, &feed_path).await.unwrap();
        feeds.push((token, feed_path, feed["id"].as_str().unwrap().to_string()));
    }

    ctx.upstream.reset().await;
    for (_, feed_path, _) in &feeds {
        ctx.mount_feed(feed_path, &guids(2)).await;
    }
    ctx.wait_for_due_interval().await;
    assert_eq!(ctx.synchronizer.sync_users().await.unwrap(), 3);

    for (token, _, feed_id) in &feeds {
        assert_eq!(feed_guids(ctx, token, feed_id).await.len(), 2);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_start_and_stop_the_synchronizer(ctx: &mut TestContext) {
    assert!(!ctx.synchronizer.is_running());
    ctx.synchronizer.start();
    assert!(ctx.synchronizer.is_running());

    ctx.synchronizer.stop().await;
    assert!(!ctx.synchronizer.is_running());
    // Idempotent.
    ctx.synchronizer.stop().await;
}
