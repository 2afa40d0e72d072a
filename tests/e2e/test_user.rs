use crate::e2e::helpers::TestContext;

use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_the_current_account(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();

    let response = ctx.client.get_with_auth("/users", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert_eq!(body["username"], "gopher");
    assert!(body.get("createdAt").is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_delete_the_account_and_everything_it_owns(ctx: &mut TestContext) {
    let token = ctx.login("gopher").await.unwrap();
    ctx.mount_feed("/rss.xml", &["a@test"]).await;
    ctx.subscribe(&token, "/rss.xml").await.unwrap();

    ctx.client
        .delete_with_auth("/users", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    // The token outlives the account but no longer authenticates.
    ctx.client
        .get_with_auth("/feeds", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);

    // The username is free again and the new account starts empty.
    let fresh = ctx.login("gopher").await.unwrap();
    let feeds = ctx.client.get_with_auth("/feeds", &fresh).await.unwrap();
    feeds.assert_status(StatusCode::OK);
    assert_eq!(feeds.json_body()["items"], serde_json::json!([]));
}
