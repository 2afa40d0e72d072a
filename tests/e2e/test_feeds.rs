use crate::e2e::helpers::{self, guids, prefixed_guids, TestContext};

use helpers::assertions::{assert_feed_response, continuation_id, listing_field, listing_ids};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_subscribe_and_list_feeds(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(1)).await;
    let subscription = ctx.feed_url("/rss.xml");

    let response = ctx
        .client
        .post_with_auth(
            "/feeds",
            &json!({ "title": "X", "subscription": subscription }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let feed = response.json_body();
    assert_feed_response(feed, &subscription, Some("X"));
    assert_eq!(feed["status"], "ok");
    assert_eq!(feed["description"], "A stub feed");
    assert!(feed.get("lastUpdated").is_some());
    assert!(feed.get("category").is_none());

    let listed = ctx.client.get_with_auth("/feeds", &token).await.unwrap();
    listed.assert_status(StatusCode::OK);
    assert_eq!(listing_ids(listed.json_body()), vec![feed["id"].as_str().unwrap().to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_the_upstream_title_when_none_is_given(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(1)).await;

    let feed = ctx.subscribe(&token, "/rss.xml").await.unwrap();

    assert_eq!(feed["title"], "Test Feed");
    assert_eq!(feed["source"], "http://example.com/");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ingest_entries_on_subscribe(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(5)).await;
    let feed = ctx.subscribe(&token, "/rss.xml").await.unwrap();
    let feed_id = feed["id"].as_str().unwrap();

    let response = ctx
        .client
        .get_with_auth(&format!("/feeds/{}/entries?count=10", feed_id), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let listing = response.json_body();
    assert_eq!(listing_field(listing, "guid"), guids(5));
    assert!(continuation_id(listing).is_none());
    assert!(listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|entry| entry["mark"] == "unread" && entry["saved"] == false && entry["feed"] == feed_id));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unreachable_or_invalid_subscriptions(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a feed</html>"))
        .mount(&ctx.upstream)
        .await;

    ctx.client
        .post_with_auth("/feeds", &json!({ "subscription": ctx.feed_url("/page") }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Could not fetch feed");

    ctx.client
        .post_with_auth("/feeds", &json!({ "subscription": "ftp://example.com/rss" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.client
        .post_with_auth("/feeds", &json!({ "subscription": "" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    let listed = ctx.client.get_with_auth("/feeds", &token).await.unwrap();
    assert!(listing_ids(listed.json_body()).is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_an_upstream_error_status(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.upstream)
        .await;

    ctx.client
        .post_with_auth("/feeds", &json!({ "subscription": ctx.feed_url("/rss.xml") }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_subscribe_into_a_category(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(1)).await;
    let category_id = ctx.create_category(&token, "News").await.unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/feeds",
            &json!({ "subscription": ctx.feed_url("/rss.xml"), "category": category_id }),
            &token,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json_body()["category"], category_id.as_str());

    let missing = ctx
        .client
        .post_with_auth(
            "/feeds",
            &json!({ "subscription": ctx.feed_url("/rss.xml"), "category": "no-such-category" }),
            &token,
        )
        .await
        .unwrap();
    missing.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_update_and_delete_a_feed(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(3)).await;
    let feed = ctx.subscribe(&token, "/rss.xml").await.unwrap();
    let feed_path = format!("/feeds/{}", feed["id"].as_str().unwrap());

    let renamed = ctx
        .client
        .put_with_auth(&feed_path, &json!({ "title": "Renamed" }), &token)
        .await
        .unwrap();
    renamed.assert_status(StatusCode::OK);
    assert_eq!(renamed.json_body()["title"], "Renamed");
    assert_eq!(renamed.json_body()["subscription"], feed["subscription"]);

    let fetched = ctx.client.get_with_auth(&feed_path, &token).await.unwrap();
    assert_eq!(fetched.json_body()["title"], "Renamed");

    ctx.client
        .delete_with_auth(&feed_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    ctx.client
        .get_with_auth(&feed_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    // Entries go with the feed.
    let entries = ctx.client.get_with_auth("/entries", &token).await.unwrap();
    assert!(listing_ids(entries.json_body()).is_empty());

    ctx.client
        .delete_with_auth(&feed_path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_hide_feeds_of_other_users(ctx: &mut TestContext) {
    let alice = ctx.login("alice").await.unwrap();
    let bob = ctx.login("bobby").await.unwrap();
    ctx.mount_feed("/rss.xml", &guids(2)).await;
    let feed = ctx.subscribe(&alice, "/rss.xml").await.unwrap();
    let feed_path = format!("/feeds/{}", feed["id"].as_str().unwrap());

    for path in [
        feed_path.clone(),
        format!("{}/entries", feed_path),
        format!("{}/stats", feed_path),
    ] {
        ctx.client
            .get_with_auth(&path, &bob)
            .await
            .unwrap()
            .assert_status(StatusCode::NOT_FOUND);
    }

    ctx.client
        .put_with_auth(&feed_path, &json!({ "title": "mine" }), &bob)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
    ctx.client
        .put_empty_with_auth(&format!("{}/mark?as=read", feed_path), &bob)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
    ctx.client
        .delete_with_auth(&feed_path, &bob)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    let bobs_feeds = ctx.client.get_with_auth("/feeds", &bob).await.unwrap();
    assert!(listing_ids(bobs_feeds.json_body()).is_empty());
    let bobs_entries = ctx.client.get_with_auth("/entries", &bob).await.unwrap();
    assert!(listing_ids(bobs_entries.json_body()).is_empty());

    // Still intact for its owner.
    ctx.client
        .get_with_auth(&feed_path, &alice)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_page_through_feeds(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    let mut created = Vec::new();
    for i in 0..7 {
        let feed_path = format!("/rss-{}.xml", i);
        ctx.mount_feed(&feed_path, &prefixed_guids(&i.to_string(), 1)).await;
        let feed = ctx.subscribe(&token, &feed_path).await.unwrap();
        created.push(feed["id"].as_str().unwrap().to_string());
    }

    let mut seen = Vec::new();
    let mut next: Option<String> = None;
    loop {
        let path = match &next {
            Some(id) => format!("/feeds?count=3&continuationId={}", id),
            None => "/feeds?count=3".to_string(),
        };
        let page = ctx.client.get_with_auth(&path, &token).await.unwrap();
        page.assert_status(StatusCode::OK);
        let ids = listing_ids(page.json_body());
        assert!(ids.len() <= 3);
        seen.extend(ids);
        next = continuation_id(page.json_body());
        if next.is_none() {
            break;
        }
    }

    let mut sorted_seen = seen.clone();
    sorted_seen.sort();
    sorted_seen.dedup();
    assert_eq!(sorted_seen.len(), seen.len(), "a feed was listed twice");
    created.sort();
    assert_eq!(sorted_seen, created);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_list_queries(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();

    ctx.client
        .get_with_auth("/entries?markedAs=starred", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);
    ctx.client
        .get_with_auth("/feeds?orderBy=sideways", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);
    ctx.client
        .get_with_auth("/feeds?count=1000", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}
