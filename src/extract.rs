// src/extract.rs
//! Article extraction: fetch a page and heuristically isolate the main body
//! text by trying a fixed priority list of content selectors.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Minimum char count for an extraction to count as a real article body
/// rather than boilerplate.
pub const SUBSTANCE_THRESHOLD_CHARS: usize = 200;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Tried in order; the first selector with a match supplies the content
/// container. Falls back to `<body>`.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    r#"[role="article"]"#,
    ".article-body",
    ".article-content",
    ".story-body",
    ".post-content",
    ".entry-content",
    "main",
];

/// Paragraphs nested under any of these are page chrome, not article text.
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "iframe",
];

static CONTENT_SELECTOR_LIST: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    /// Fetch `url` and return its main body text, or `None` when the page
    /// cannot be fetched or yields nothing substantial. Never errors; a
    /// missing body is an expected outcome, handled by the summary fallback.
    async fn extract(&self, url: &str) -> Option<String>;
}

fn under_noise(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| NOISE_TAGS.contains(&a.value().name()))
}

/// Pure extraction from already-fetched HTML. Tolerates arbitrary and
/// malformed markup (the parser is lenient by design).
pub fn extract_from_html(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    let container = CONTENT_SELECTOR_LIST
        .iter()
        .find_map(|sel| doc.select(sel).next())
        .or_else(|| doc.select(&BODY_SELECTOR).next())?;

    let paragraphs: Vec<String> = container
        .select(&P_SELECTOR)
        .filter(|p| !under_noise(p))
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let text = paragraphs.join("\n\n").replace("\n\n\n", "\n\n");

    if text.chars().count() > SUBSTANCE_THRESHOLD_CHARS {
        Some(text)
    } else {
        None
    }
}

pub struct HttpExtractor {
    client: reqwest::Client,
}

impl HttpExtractor {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("building extractor http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArticleExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Option<String> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, url, "article fetch failed");
                return None;
            }
        };

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url, "article fetch non-success");
            return None;
        }

        let html = match resp.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(error = ?e, url, "article body read failed");
                return None;
            }
        };

        extract_from_html(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(inner: &str) -> String {
        format!("<!DOCTYPE html><html><head><title>t</title></head><body>{inner}</body></html>")
    }

    fn long_text(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn prefers_article_tag_over_later_selectors() {
        let html = page(&format!(
            "<main><p>{}</p></main><article><p>{}</p></article>",
            long_text(300),
            long_text(250)
        ));
        let out = extract_from_html(&html).unwrap();
        assert_eq!(out, long_text(250));
    }

    #[test]
    fn role_article_wins_over_class_selectors() {
        let html = page(&format!(
            r#"<div class="article-body"><p>{}</p></div><div role="article"><p>{}</p></div>"#,
            long_text(300),
            long_text(250)
        ));
        assert_eq!(extract_from_html(&html).unwrap(), long_text(250));
    }

    #[test]
    fn falls_back_to_body_when_no_selector_matches() {
        let html = page(&format!("<div><p>{}</p></div>", long_text(300)));
        assert_eq!(extract_from_html(&html).unwrap(), long_text(300));
    }

    #[test]
    fn skips_paragraphs_inside_noise_elements() {
        let html = page(&format!(
            "<article><nav><p>skip me</p></nav><p>{}</p><footer><p>and me</p></footer></article>",
            long_text(300)
        ));
        let out = extract_from_html(&html).unwrap();
        assert!(!out.contains("skip me"));
        assert!(!out.contains("and me"));
    }

    #[test]
    fn joins_paragraphs_with_blank_lines_and_trims() {
        let first = long_text(150);
        let second = long_text(120);
        let html = page(&format!(
            "<article><p>  {first}  </p><p></p><p>{second}</p></article>"
        ));
        let out = extract_from_html(&html).unwrap();
        assert_eq!(out, format!("{first}\n\n{second}"));
    }

    #[test]
    fn substance_threshold_is_exclusive_at_200() {
        let html_199 = page(&format!("<article><p>{}</p></article>", long_text(199)));
        assert_eq!(extract_from_html(&html_199), None);

        let html_200 = page(&format!("<article><p>{}</p></article>", long_text(200)));
        assert_eq!(extract_from_html(&html_200), None);

        let html_201 = page(&format!("<article><p>{}</p></article>", long_text(201)));
        assert_eq!(extract_from_html(&html_201), Some(long_text(201)));
    }

    #[test]
    fn tolerates_malformed_markup() {
        let html = format!(
            "<html><body><article><p>{}<p>{}</article>",
            long_text(150),
            long_text(120)
        );
        assert!(extract_from_html(&html).is_some());
    }
}
