// src/pipeline.rs
//! One digest run: fetch every configured feed in order, enrich articles with
//! scraped bodies, assemble and render the digest, then deliver it. Per-feed
//! and per-article failures are absorbed; only delivery failure fails the run.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::DigestConfig;
use crate::digest::{assemble, FeedResult};
use crate::extract::ArticleExtractor;
use crate::feed::FeedProvider;
use crate::notify::{DigestMailer, OutboundDigest};
use crate::render::render;

/// End-of-run summary for the human-readable closing log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub sections: usize,
    pub articles_total: usize,
    pub bodies_extracted: usize,
    pub preview_path: Option<PathBuf>,
}

/// Fetch all feeds and attempt body extraction for every article with a
/// link. Sequential on purpose: one request in flight at a time, with the
/// configured courtesy pause after each extraction attempt.
pub async fn collect(
    cfg: &DigestConfig,
    provider: &dyn FeedProvider,
    extractor: &dyn ArticleExtractor,
) -> Vec<FeedResult> {
    let delay = Duration::from_millis(cfg.delivery.fetch_delay_ms);
    let mut results = Vec::with_capacity(cfg.feeds.len());

    for source in &cfg.feeds {
        info!(feed = %source.name, url = %source.url, "fetching feed");
        let mut articles = match provider.fetch(source).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = ?e, feed = %source.name, "feed fetch failed, contributing nothing");
                Vec::new()
            }
        };

        for article in &mut articles {
            if article.link.is_empty() {
                continue;
            }
            match extractor.extract(&article.link).await {
                Some(body) => {
                    debug!(link = %article.link, chars = body.chars().count(), "got full article");
                    article.body = Some(body);
                }
                None => {
                    debug!(link = %article.link, "no substantial body, using feed summary");
                }
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        info!(feed = %source.name, articles = articles.len(), "feed processed");
        results.push(FeedResult {
            source: source.clone(),
            articles,
        });
    }

    results
}

/// Run the whole pipeline once and deliver the result.
pub async fn run(
    cfg: &DigestConfig,
    provider: &dyn FeedProvider,
    extractor: &dyn ArticleExtractor,
    mailer: &dyn DigestMailer,
) -> Result<RunReport> {
    let results = collect(cfg, provider, extractor).await;

    let articles_total: usize = results.iter().map(|r| r.articles.len()).sum();
    let bodies_extracted: usize = results
        .iter()
        .flat_map(|r| &r.articles)
        .filter(|a| a.body.is_some())
        .count();
    let sections = results.iter().filter(|r| !r.articles.is_empty()).count();

    let generated_at = chrono::Local::now().date_naive();
    let doc = assemble(generated_at, results);
    let html = render(&doc);

    // Best-effort local preview; failure to write never fails the run.
    let mut preview_path = None;
    if let Some(path) = &cfg.delivery.preview_path {
        match std::fs::write(path, &html) {
            Ok(()) => {
                info!(path = %path.display(), "preview saved");
                preview_path = Some(path.clone());
            }
            Err(e) => warn!(error = ?e, path = %path.display(), "preview not saved"),
        }
    }

    let digest = OutboundDigest::new(html, generated_at);
    mailer
        .send(&digest)
        .await
        .context("delivering digest email")?;

    let report = RunReport {
        sections,
        articles_total,
        bodies_extracted,
        preview_path,
    };
    info!(
        sections = report.sections,
        articles = report.articles_total,
        full_bodies = report.bodies_extracted,
        "digest run complete"
    );
    Ok(report)
}
