use anyhow::{anyhow, Result};
use feedhub::domain::sync::Synchronizer;
use feedhub::infrastructure::app::App;
use feedhub::infrastructure::config::{Cli, Config, FileConfig};
use feedhub::infrastructure::fetcher::HttpFeedFetcher;
use feedhub::infrastructure::http::serve;
use feedhub::infrastructure::repositories::Repositories;
use hyper::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


use api_client::TestClient;

pub const TEST_PASSWORD: &str = "testtesttest";
pub const TEST_ETAG: &str = "\"123456\"";

/// One application instance over the in-memory store, served on an
/// ephemeral port, plus a stub server for upstream feeds.
pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    pub upstream: MockServer,
    pub synchronizer: Arc<Synchronizer>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let cli = Cli {
            database_url: Some("memory://".to_string()),
            listen_addr: Some("127.0.0.1:0".to_string()),
            jwt_secret: Some("test-jwt-secret-key-for-testing-only".to_string()),
            sync_interval_secs: Some(1),
            fetch_timeout_secs: Some(5),
            ..Cli::default()
        };
        let config = Config::resolve(cli, FileConfig::default())?;

        let fetcher = Arc::new(HttpFeedFetcher::new(config.fetch_timeout)?);
        let app = App::build(&config, Repositories::in_memory(), fetcher, None);

        let listener = TcpListener::bind(config.listen_addr).await?;
        let base_url = format!("http://{}/v1", listener.local_addr()?);
        let router = app.router;
        tokio::spawn(async move {
            if let Err(e) = serve(listener, router, std::future::pending()).await {
                eprintln!("test server failed: {}", e);
            }
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            config,
            upstream: MockServer::start().await,
            synchronizer: app.synchronizer,
        })
    }

    /// Register an account and log in, returning the access token.
    pub async fn login(&self, username: &str) -> Result<String> {
        Ok(self.login_pair(username).await?.0)
    }

    /// Register an account and log in, returning the access and refresh tokens.
    pub async fn login_pair(&self, username: &str) -> Result<(String, String)> {
        let credentials = json!({ "username": username, "password": TEST_PASSWORD });

        let registered = self.client.post("/auth/register", &credentials).await?;
        if registered.status != StatusCode::CREATED {
            return Err(anyhow!("register failed with {}", registered.status));
        }

        let response = self.client.post("/auth/login", &credentials).await?;
        let body = response
            .body
            .ok_or_else(|| anyhow!("login failed with {}", response.status))?;
        let token = |name: &str| {
            body.get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| anyhow!("login response without {}", name))
        };
        Ok((token("accessToken")?, token("refreshToken")?))
    }

    pub fn feed_url(&self, feed_path: &str) -> String {
        format!("{}{}", self.upstream.uri(), feed_path)
    }

    /// Serve an RSS document with the given GUIDs at `feed_path`.
    pub async fn mount_feed<G: AsRef<str>>(&self, feed_path: &str, guids: &[G]) {
        Mock::given(method("GET"))
            .and(path(feed_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "application/rss+xml")
                    .set_body_string(rss_document(guids)),
            )
            .mount(&self.upstream)
            .await;
    }

    /// Serve an RSS document carrying `TEST_ETAG`, answering 304 to
    /// requests that present it.
    pub async fn mount_feed_with_etag<G: AsRef<str>>(&self, feed_path: &str, guids: &[G]) {
        Mock::given(method("GET"))
            .and(path(feed_path))
            .and(header("If-None-Match", TEST_ETAG))
            .respond_with(ResponseTemplate::new(304))
            .with_priority(1)
            .mount(&self.upstream)
            .await;
        Mock::given(method("GET"))
            .and(path(feed_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ETag", TEST_ETAG)
                    .set_body_string(rss_document(guids)),
            )
            .mount(&self.upstream)
            .await;
    }

    /// Subscribe to a stubbed feed and return its JSON body.
    pub async fn subscribe(&self, token: &str, feed_path: &str) -> Result<Value> {
        let response = self
            .client
            .post_with_auth(
                "/feeds",
                &json!({ "subscription": self.feed_url(feed_path) }),
                token,
            )
            .await?;
        if response.status != StatusCode::CREATED {
            return Err(anyhow!("subscribe failed with {}", response.status));
        }
        response.body.ok_or_else(|| anyhow!("subscribe returned no body"))
    }

    pub async fn create_category(&self, token: &str, name: &str) -> Result<String> {
        let response = self
            .client
            .post_with_auth("/categories", &json!({ "name": name }), token)
            .await?;
        id_of(response.body, response.status)
    }

    pub async fn create_tag(&self, token: &str, name: &str) -> Result<String> {
        let response = self
            .client
            .post_with_auth("/tags", &json!({ "name": name }), token)
            .await?;
        id_of(response.body, response.status)
    }

    /// Let every synced feed become due again.
    pub async fn wait_for_due_interval(&self) {
        tokio::time::sleep(self.config.sync_interval + std::time::Duration::from_millis(100)).await;
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            TestContext::new()
                .await
                .expect("Failed to start test application")
        }
    }
}

fn id_of(body: Option<Value>, status: StatusCode) -> Result<String> {
    if status != StatusCode::CREATED {
        return Err(anyhow!("create failed with {}", status));
    }
    body.as_ref()
        .and_then(|b| b.get("id"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("create returned no id"))
}

/// An RSS 2.0 document with one item per GUID, newest first. At most
/// 28 items get distinct dates.
pub fn rss_document<G: AsRef<str>>(guids: &[G]) -> String {
    let items: String = guids
        .iter()
        .enumerate()
        .map(|(i, guid)| {
            format!(
                "<item><title>Item {i}</title><link>http://example.com/{guid}</link>\
                 <guid>{guid}</guid><pubDate>{day:02} Jan 2024 10:00:00 GMT</pubDate></item>",
                i = i,
                guid = guid.as_ref(),
                day = (guids.len() - i).min(28),
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>Test Feed</title>
<link>http://example.com/</link>
<description>A stub feed</description>
{}
</channel></rss>"#,
        items
    )
}

/// `item1@test` .. `item{n}@test`
pub fn guids(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("item{}@test", i)).collect()
}

/// `{prefix}-item1@test` .. `{prefix}-item{n}@test`. Entries are
/// de-duplicated by GUID across all feeds of a user, so feeds sharing a
/// user need distinct GUIDs.
pub fn prefixed_guids(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{}-item{}@test", prefix, i)).collect()
}
