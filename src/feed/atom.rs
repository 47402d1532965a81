// src/feed/atom.rs
use anyhow::{anyhow, Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::digest::Article;

#[derive(Debug, Deserialize)]
struct Feed {
    title: Option<Text>,
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<Text>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
    summary: Option<Text>,
    content: Option<Text>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

// Atom text constructs carry a type attribute, so the value sits in $text.
#[derive(Debug, Deserialize)]
struct Text {
    #[serde(rename = "$text")]
    value: Option<String>,
}

fn text_of(t: Option<Text>) -> Option<String> {
    t.and_then(|t| t.value)
}

/// The entry's primary link: rel="alternate" (or no rel) wins, else the
/// first link present.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .and_then(|l| l.href.clone())
}

/// Parse an Atom document into articles, in feed order.
pub fn parse(xml: &str) -> Result<Vec<Article>> {
    let feed: Feed = from_str(xml).context("parsing atom xml")?;

    // quick-xml's serde layer ignores the root element name, so an arbitrary
    // XML document would otherwise pass as an empty feed.
    if feed.title.is_none() && feed.entries.is_empty() {
        return Err(anyhow!("document has no atom feed title or entries"));
    }

    let out = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = primary_link(&entry.links).unwrap_or_default();
            let summary = text_of(entry.summary)
                .or_else(|| text_of(entry.content))
                .unwrap_or_default();
            Article {
                title: text_of(entry.title).unwrap_or_else(|| "No title".to_string()),
                link,
                summary,
                published: entry
                    .published
                    .or(entry.updated)
                    .unwrap_or_else(|| "Unknown date".to_string()),
                body: None,
            }
        })
        .collect();
    Ok(out)
}
