use crate::e2e::helpers::{self, prefixed_guids, TestContext};

use helpers::assertions::{listing_field, listing_ids};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use test_context::test_context;

fn document(ctx: &TestContext) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="2.0">
  <head><title>subscriptions</title></head>
  <body>
    <outline text="Tech">
      <outline type="rss" text="First" xmlUrl="{first}"/>
    </outline>
    <outline type="rss" text="Second" xmlUrl="{second}"/>
    <outline type="rss" text="Mail" xmlUrl="mailto:someone@example.com"/>
  </body>
</opml>"#,
        first = ctx.feed_url("/first.xml"),
        second = ctx.feed_url("/second.xml"),
    )
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_import_then_sync_subscriptions(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/first.xml", &prefixed_guids("first", 2)).await;
    ctx.mount_feed("/second.xml", &prefixed_guids("second", 3)).await;

    let imported = ctx
        .client
        .post_raw_with_auth("/opml", &document(ctx), "text/x-opml; charset=utf-8", &token)
        .await
        .unwrap();
    imported.assert_status(StatusCode::OK);
    assert_eq!(
        imported.json_body(),
        &serde_json::json!({ "categoriesCreated": 1, "feedsCreated": 2, "feedsSkipped": 1 })
    );

    // Nothing is pulled at import time.
    assert!(ctx.upstream.received_requests().await.unwrap().is_empty());
    let feeds = ctx.client.get_with_auth("/feeds", &token).await.unwrap();
    assert_eq!(
        listing_field(feeds.json_body(), "status"),
        vec!["pending".to_string(), "pending".to_string()]
    );

    let uncategorized = ctx
        .client
        .get_with_auth("/feeds/uncategorized", &token)
        .await
        .unwrap();
    assert_eq!(listing_field(uncategorized.json_body(), "title"), vec!["Second".to_string()]);

    ctx.synchronizer.sync_users().await.unwrap();

    let feeds = ctx.client.get_with_auth("/feeds", &token).await.unwrap();
    assert_eq!(
        listing_field(feeds.json_body(), "status"),
        vec!["ok".to_string(), "ok".to_string()]
    );
    let entries = ctx.client.get_with_auth("/entries", &token).await.unwrap();
    assert_eq!(listing_ids(entries.json_body()).len(), 5);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_existing_subscriptions_on_reimport(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();

    for _ in 0..2 {
        ctx.client
            .post_raw_with_auth("/opml", &document(ctx), "application/xml", &token)
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let feeds = ctx.client.get_with_auth("/feeds", &token).await.unwrap();
    assert_eq!(listing_ids(feeds.json_body()).len(), 2);
    let categories = ctx.client.get_with_auth("/categories", &token).await.unwrap();
    assert_eq!(listing_field(categories.json_body(), "name"), vec!["Tech".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_export_categories_and_feeds(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.client
        .post_raw_with_auth("/opml", &document(ctx), "text/xml", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let exported = ctx.client.get_with_auth("/opml", &token).await.unwrap();
    exported.assert_status(StatusCode::OK);
    assert!(exported
        .header("content-type")
        .is_some_and(|v| v.starts_with("text/x-opml")));

    let body = exported.text();
    let tech = body.find("Tech").expect("category missing from export");
    let first = body.find(&ctx.feed_url("/first.xml")).expect("first feed missing");
    let second = body.find(&ctx.feed_url("/second.xml")).expect("second feed missing");
    assert!(tech < first && first < second);
    assert!(!body.contains("mailto:"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_content_types(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();

    ctx.client
        .post_raw_with_auth("/opml", &document(ctx), "application/json", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unsupported content type");

    ctx.client
        .post_raw_with_auth("/opml", "this is not xml", "text/xml", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid OPML");
}
