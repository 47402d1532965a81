// src/digest.rs
//! Digest data model and assembly: merges per-feed results into one ordered
//! document and derives the table of contents.

use chrono::NaiveDate;
use serde::Deserialize;

/// Shown in an article block when neither an extracted body nor a feed
/// summary is available.
pub const MISSING_CONTENT_PLACEHOLDER: &str = "Content not available";

/// Maximum length (in chars) of a TOC short summary before truncation.
pub const SHORT_SUMMARY_CHARS: usize = 150;

/// One configured feed. Static for the duration of a run.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    pub max_articles: usize,
}

/// One feed entry, optionally enriched with the scraped page body.
/// `published` stays in whatever format the feed used; it is display-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
    pub body: Option<String>,
}

/// Everything one feed contributed. A failed fetch contributes an empty
/// article list, never a missing section.
#[derive(Debug, Clone)]
pub struct FeedResult {
    pub source: FeedSource,
    pub articles: Vec<Article>,
}

/// The complete in-memory digest handed to the renderer. Section order equals
/// configuration order; article order equals feed entry order.
#[derive(Debug, Clone)]
pub struct DigestDocument {
    pub generated_at: NaiveDate,
    pub sections: Vec<FeedResult>,
}

/// One table-of-contents line. `id` is 1-based and unique across the whole
/// document; the renderer emits the matching `article-{id}` anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: usize,
    pub title: String,
    pub short_summary: String,
}

/// TOC subsection for one feed. Feeds without articles get no subsection.
#[derive(Debug, Clone)]
pub struct TocSection {
    pub source_name: String,
    pub entries: Vec<TocEntry>,
}

pub fn assemble(generated_at: NaiveDate, sections: Vec<FeedResult>) -> DigestDocument {
    DigestDocument {
        generated_at,
        sections,
    }
}

/// Decode HTML entities, then drop every `<...>` tag run.
pub fn strip_tags(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    re_tags.replace_all(&decoded, "").to_string()
}

/// The text an article block displays: extracted body when present and
/// non-empty, else the feed summary, else the placeholder.
pub fn effective_content(article: &Article) -> String {
    match &article.body {
        Some(body) if !body.trim().is_empty() => body.clone(),
        _ if !article.summary.trim().is_empty() => article.summary.clone(),
        _ => MISSING_CONTENT_PLACEHOLDER.to_string(),
    }
}

/// Tag-stripped, trimmed, capped at [`SHORT_SUMMARY_CHARS`] chars with a
/// trailing "..." only when something was cut off.
pub fn short_summary(content: &str) -> String {
    let clean = strip_tags(content);
    let clean = clean.trim();
    if clean.chars().count() > SHORT_SUMMARY_CHARS {
        let head: String = clean.chars().take(SHORT_SUMMARY_CHARS).collect();
        format!("{head}...")
    } else {
        clean.to_string()
    }
}

/// Derive the table of contents. Ids run 1-based across all sections in
/// document order, matching the counter the renderer uses for body anchors.
pub fn table_of_contents(doc: &DigestDocument) -> Vec<TocSection> {
    let mut out = Vec::new();
    let mut counter = 0usize;
    for section in &doc.sections {
        if section.articles.is_empty() {
            continue;
        }
        let mut entries = Vec::with_capacity(section.articles.len());
        for article in &section.articles {
            counter += 1;
            // The TOC tier falls back body -> summary -> empty, not to the
            // article-block placeholder.
            let content = match &article.body {
                Some(body) if !body.trim().is_empty() => body.as_str(),
                _ => article.summary.as_str(),
            };
            entries.push(TocEntry {
                id: counter,
                title: article.title.clone(),
                short_summary: short_summary(content),
            });
        }
        out.push(TocSection {
            source_name: section.source.name.clone(),
            entries,
        });
    }
    out
}
