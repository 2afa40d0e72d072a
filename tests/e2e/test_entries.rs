use crate::e2e::helpers::{self, guids, TestContext};

use helpers::assertions::{assert_stats, continuation_id, listing_field, listing_ids};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

/// Subscribe to a feed with `n` items and return the entry ids, newest first.
async fn seed_entries(ctx: &TestContext, token: &str, n: usize) -> Vec<String> {
    ctx.mount_feed("/rss.xml", &guids(n)).await;
    ctx.subscribe(token, "/rss.xml").await.unwrap();
    let response = ctx
        .client
        .get_with_auth("/entries?count=100", token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    listing_ids(response.json_body())
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_newest_first_by_default(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    seed_entries(ctx, &token, 4).await;

    let newest = ctx.client.get_with_auth("/entries", &token).await.unwrap();
    assert_eq!(listing_field(newest.json_body(), "guid"), guids(4));

    let oldest = ctx
        .client
        .get_with_auth("/entries?orderBy=oldest", &token)
        .await
        .unwrap();
    let mut reversed = guids(4);
    reversed.reverse();
    assert_eq!(listing_field(oldest.json_body(), "guid"), reversed);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_page_through_every_entry_once(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    let all = seed_entries(ctx, &token, 11).await;

    for order in ["newest", "oldest"] {
        let mut seen = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let mut path = format!("/entries?count=4&orderBy={}", order);
            if let Some(id) = &next {
                path.push_str(&format!("&continuationId={}", id));
            }
            let page = ctx.client.get_with_auth(&path, &token).await.unwrap();
            page.assert_status(StatusCode::OK);
            seen.extend(listing_ids(page.json_body()));
            next = continuation_id(page.json_body());
            if next.is_none() {
                break;
            }
        }

        let mut expected = all.clone();
        if order == "oldest" {
            expected.reverse();
        }
        assert_eq!(seen, expected, "order = {}", order);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_mark_entries_and_filter_by_mark(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    let ids = seed_entries(ctx, &token, 3).await;

    ctx.client
        .put_empty_with_auth(&format!("/entries/{}/mark?as=read", ids[1]), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    let entry = ctx
        .client
        .get_with_auth(&format!("/entries/{}", ids[1]), &token)
        .await
        .unwrap();
    entry.assert_status(StatusCode::OK);
    assert_eq!(entry.json_body()["mark"], "read");

    let read = ctx
        .client
        .get_with_auth("/entries?markedAs=read", &token)
        .await
        .unwrap();
    assert_eq!(listing_ids(read.json_body()), vec![ids[1].clone()]);

    let unread = ctx
        .client
        .get_with_auth("/entries?markedAs=unread", &token)
        .await
        .unwrap();
    assert_eq!(listing_ids(unread.json_body()), vec![ids[0].clone(), ids[2].clone()]);

    let any = ctx
        .client
        .get_with_auth("/entries?markedAs=any", &token)
        .await
        .unwrap();
    assert_eq!(listing_ids(any.json_body()), ids);

    ctx.client
        .put_empty_with_auth(&format!("/entries/{}/mark?as=later", ids[0]), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_mark_everything_at_once(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    seed_entries(ctx, &token, 5).await;

    ctx.client
        .put_empty_with_auth("/entries/mark?as=read", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);
    let stats = ctx.client.get_with_auth("/entries/stats", &token).await.unwrap();
    assert_stats(stats.json_body(), 0, 5, 0, 5);

    ctx.client
        .put_empty_with_auth("/entries/mark?as=unread", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);
    let stats = ctx.client.get_with_auth("/entries/stats", &token).await.unwrap();
    assert_stats(stats.json_body(), 5, 0, 0, 5);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_save_entries(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    let ids = seed_entries(ctx, &token, 2).await;

    let saved = ctx
        .client
        .put_with_auth(&format!("/entries/{}/saved", ids[0]), &json!({ "saved": true }), &token)
        .await
        .unwrap();
    saved.assert_status(StatusCode::OK);
    assert_eq!(saved.json_body()["saved"], true);

    let stats = ctx.client.get_with_auth("/entries/stats", &token).await.unwrap();
    assert_stats(stats.json_body(), 2, 0, 1, 2);

    let unsaved = ctx
        .client
        .put_with_auth(&format!("/entries/{}/saved", ids[0]), &json!({ "saved": false }), &token)
        .await
        .unwrap();
    assert_eq!(unsaved.json_body()["saved"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_feed_stats(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(3)).await;
    let feed = ctx.subscribe(&token, "/rss.xml").await.unwrap();
    let feed_path = format!("/feeds/{}", feed["id"].as_str().unwrap());

    ctx.client
        .put_empty_with_auth(&format!("{}/mark?as=read", feed_path), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    let stats = ctx
        .client
        .get_with_auth(&format!("{}/stats", feed_path), &token)
        .await
        .unwrap();
    stats.assert_status(StatusCode::OK);
    assert_stats(stats.json_body(), 0, 3, 0, 3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_hide_entries_of_other_users(ctx: &mut TestContext) {
    let alice = ctx.login("alice").await.unwrap();
    let bob = ctx.login("bobby").await.unwrap();
    let ids = seed_entries(ctx, &alice, 1).await;
    let entry_path = format!("/entries/{}", ids[0]);

    ctx.client
        .get_with_auth(&entry_path, &bob)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
    ctx.client
        .put_empty_with_auth(&format!("{}/mark?as=read", entry_path), &bob)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
    ctx.client
        .put_with_auth(&format!("{}/saved", entry_path), &json!({ "saved": true }), &bob)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    // Bob marking all of his entries leaves Alice's alone.
    ctx.client
        .put_empty_with_auth("/entries/mark?as=read", &bob)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);
    let stats = ctx.client.get_with_auth("/entries/stats", &alice).await.unwrap();
    assert_stats(stats.json_body(), 1, 0, 0, 1);
}
