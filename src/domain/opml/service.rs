use std::collections::HashSet;
use std::sync::Arc;

use opml::{Head, Outline, OPML};

use super::{ImportReport, OpmlServiceError};
use crate::domain::category::{Category, CategoryRepository};
use crate::domain::feed::{Feed, FeedRepository};
use crate::domain::pagination::{Listing, Page, MAX_PAGE_SIZE};
use crate::domain::shared::{RepositoryError, RepositoryResult};

const EXPORT_TITLE: &str = "feedhub subscriptions";

/// Imports and exports a user's subscriptions as OPML 2.0.
///
/// A top-level outline carrying an `xmlUrl` is an uncategorized feed; any
/// other top-level outline is a category whose descendants with an
/// `xmlUrl` are its feeds.
pub struct OpmlService {
    feed_repo: Arc<dyn FeedRepository>,
    category_repo: Arc<dyn CategoryRepository>,
}

impl OpmlService {
    pub fn new(
        feed_repo: Arc<dyn FeedRepository>,
        category_repo: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            feed_repo,
            category_repo,
        }
    }

    pub async fn export(&self, user_id: &str) -> Result<String, OpmlServiceError> {
        let mut document = OPML {
            head: Some(Head {
                title: Some(EXPORT_TITLE.to_string()),
                ..Head::default()
            }),
            ..OPML::default()
        };

        let categories = collect(|page| {
            let page = page.clone();
            async move { self.category_repo.list(user_id, &page).await }
        })
        .await?;

        for category in categories {
            let feeds = collect(|page| {
                let page = page.clone().filtered(category.id.clone());
                async move { self.category_repo.feeds(user_id, &page).await }
            })
            .await?;

            document.body.outlines.push(Outline {
                text: category.name.clone(),
                title: Some(category.name),
                outlines: feeds.iter().map(feed_outline).collect(),
                ..Outline::default()
            });
        }

        let uncategorized = collect(|page| {
            let page = page.clone();
            async move { self.category_repo.uncategorized(user_id, &page).await }
        })
        .await?;
        document
            .body
            .outlines
            .extend(uncategorized.iter().map(feed_outline));

        Ok(document.to_string()?)
    }

    /// Imported feeds stay pending until the next sync pulls them.
    /// Subscriptions the user already has are skipped.
    pub async fn import(
        &self,
        user_id: &str,
        document: &str,
    ) -> Result<ImportReport, OpmlServiceError> {
        let document = OPML::from_str(document)?;
        let mut report = ImportReport::default();

        let mut subscribed: HashSet<String> = collect(|page| {
            let page = page.clone();
            async move { self.feed_repo.list(user_id, &page).await }
        })
        .await?
        .into_iter()
        .map(|feed| feed.subscription)
        .collect();

        for outline in &document.body.outlines {
            if outline.xml_url.is_some() {
                self.import_feed(user_id, None, outline, &mut subscribed, &mut report)
                    .await?;
                continue;
            }

            let mut children = Vec::new();
            flatten_feeds(&outline.outlines, &mut children);
            if children.is_empty() {
                continue;
            }

            let name = outline_title(outline);
            if name.is_empty() {
                report.feeds_skipped += children.len();
                continue;
            }
            let category_id = self.category_for(user_id, &name, &mut report).await?;
            for child in children {
                self.import_feed(user_id, Some(&category_id), child, &mut subscribed, &mut report)
                    .await?;
            }
        }

        tracing::info!(
            user_id = %user_id,
            categories = report.categories_created,
            feeds = report.feeds_created,
            skipped = report.feeds_skipped,
            "OPML imported"
        );
        Ok(report)
    }

    /// Reuse a category with the same name, compared case-insensitively.
    async fn category_for(
        &self,
        user_id: &str,
        name: &str,
        report: &mut ImportReport,
    ) -> Result<String, OpmlServiceError> {
        match self.category_repo.category_with_name(user_id, name).await {
            Ok(category) => return Ok(category.id),
            Err(RepositoryError::ModelNotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let category = Category::new(user_id, name);
        self.category_repo.create(user_id, &category).await?;
        report.categories_created += 1;
        Ok(category.id)
    }

    async fn import_feed(
        &self,
        user_id: &str,
        category_id: Option<&str>,
        outline: &Outline,
        subscribed: &mut HashSet<String>,
        report: &mut ImportReport,
    ) -> Result<(), OpmlServiceError> {
        let subscription = match outline.xml_url.as_deref().map(parse_subscription) {
            Some(Some(url)) => url,
            _ => {
                tracing::debug!(text = %outline.text, "Skipping outline without a usable xmlUrl");
                report.feeds_skipped += 1;
                return Ok(());
            }
        };
        if !subscribed.insert(subscription.clone()) {
            report.feeds_skipped += 1;
            return Ok(());
        }

        let mut feed = Feed::new(user_id, &subscription, &outline_title(outline));
        feed.category_id = category_id.map(str::to_string);
        self.feed_repo.create(user_id, &feed).await?;
        report.feeds_created += 1;
        Ok(())
    }
}

fn feed_outline(feed: &Feed) -> Outline {
    Outline {
        text: feed.title.clone(),
        title: Some(feed.title.clone()),
        r#type: Some("rss".to_string()),
        xml_url: Some(feed.subscription.clone()),
        html_url: (!feed.source.is_empty()).then(|| feed.source.clone()),
        ..Outline::default()
    }
}

fn outline_title(outline: &Outline) -> String {
    outline
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&outline.text)
        .trim()
        .to_string()
}

fn parse_subscription(raw: &str) -> Option<String> {
    let url = url::Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

/// Every outline below `outlines` that carries an `xmlUrl`, depth first.
fn flatten_feeds<'a>(outlines: &'a [Outline], out: &mut Vec<&'a Outline>) {
    for outline in outlines {
        if outline.xml_url.is_some() {
            out.push(outline);
        }
        flatten_feeds(&outline.outlines, out);
    }
}

/// Drain a paginated listing.
async fn collect<T, F, Fut>(mut fetch: F) -> RepositoryResult<Vec<T>>
where
    F: FnMut(&Page) -> Fut,
    Fut: std::future::Future<Output = RepositoryResult<Listing<T>>>,
{
    let mut page = Page::new(MAX_PAGE_SIZE);
    let mut items = Vec::new();
    loop {
        let listing = fetch(&page).await?;
        items.extend(listing.items);
        match listing.continuation_id {
            Some(next) => page = page.after(next),
            None => return Ok(items),
        }
    }
}
