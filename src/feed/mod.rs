// src/feed/mod.rs
//! Feed reading: fetch a configured RSS/Atom feed and map its entries to
//! [`Article`]s, truncated to the source's `max_articles`.

pub mod atom;
pub mod rss;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::digest::{Article, FeedSource};

#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch one configured feed. Errors are absorbed by the pipeline (the
    /// feed contributes nothing); they never abort the run.
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<Article>>;
}

/// Parse feed content as RSS 2.0 first, falling back to Atom, then truncate
/// to `max_articles` keeping feed order.
pub fn parse_feed(content: &str, max_articles: usize) -> Result<Vec<Article>> {
    let mut articles = match rss::parse(content) {
        Ok(items) => items,
        Err(rss_err) => {
            tracing::debug!(error = ?rss_err, "not rss, trying atom");
            atom::parse(content)
                .map_err(|atom_err| anyhow!("feed is neither rss ({rss_err:#}) nor atom ({atom_err:#})"))?
        }
    };
    articles.truncate(max_articles);
    Ok(articles)
}

pub struct HttpFeedProvider {
    client: reqwest::Client,
}

impl HttpFeedProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFeedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedProvider for HttpFeedProvider {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<Article>> {
        let resp = self
            .client
            .get(&source.url)
            .send()
            .await
            .with_context(|| format!("fetching feed {}", source.url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("feed {} returned HTTP {}", source.url, status.as_u16()));
        }

        let content = resp
            .text()
            .await
            .with_context(|| format!("reading feed body from {}", source.url))?;

        parse_feed(&content, source.max_articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<rss version="2.0"><channel><title>T</title>
<item><title>1</title></item>
<item><title>2</title></item>
<item><title>3</title></item>
</channel></rss>"#;

    #[test]
    fn truncates_to_max_articles() {
        let articles = parse_feed(RSS, 2).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "1");
        assert_eq!(articles[1].title, "2");
    }

    #[test]
    fn max_articles_zero_keeps_nothing() {
        assert!(parse_feed(RSS, 0).unwrap().is_empty());
    }

    #[test]
    fn falls_back_to_atom() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>A</title>
<entry><title>only</title><link href="https://example.test/x"/></entry></feed>"#;
        let articles = parse_feed(xml, 5).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "only");
    }

    #[test]
    fn unparseable_content_is_an_error() {
        assert!(parse_feed("{\"not\": \"xml\"}", 5).is_err());
    }
}
