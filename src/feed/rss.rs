// src/feed/rss.rs
use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::digest::Article;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Parse an RSS 2.0 document into articles, in feed order.
pub fn parse(xml: &str) -> Result<Vec<Article>> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;

    let out = rss
        .channel
        .items
        .into_iter()
        .map(|it| Article {
            title: it.title.unwrap_or_else(|| "No title".to_string()),
            link: it.link.unwrap_or_default(),
            summary: it.description.unwrap_or_default(),
            published: it.pub_date.unwrap_or_else(|| "Unknown date".to_string()),
            body: None,
        })
        .collect();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_in_feed_order_with_defaults() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example</title>
  <item>
    <title>First</title>
    <link>https://example.test/1</link>
    <description>One</description>
    <pubDate>Mon, 04 Aug 2025 09:00:00 GMT</pubDate>
  </item>
  <item>
    <description>no title, no link</description>
  </item>
</channel></rss>"#;

        let articles = parse(xml).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First");
        assert_eq!(articles[0].link, "https://example.test/1");
        assert_eq!(articles[0].published, "Mon, 04 Aug 2025 09:00:00 GMT");
        assert_eq!(articles[1].title, "No title");
        assert_eq!(articles[1].link, "");
        assert_eq!(articles[1].published, "Unknown date");
        assert!(articles.iter().all(|a| a.body.is_none()));
    }

    #[test]
    fn empty_channel_yields_no_articles() {
        let xml = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        assert!(parse(xml).unwrap().is_empty());
    }

    #[test]
    fn non_rss_input_is_an_error() {
        assert!(parse("<feed></feed>").is_err());
        assert!(parse("not xml at all").is_err());
    }
}
