//! RSS to Kindle Digest — Binary Entrypoint
//! Loads configuration, runs the fetch/extract/render pipeline once, and
//! mails the result to the device inbox.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kindle_digest::config;
use kindle_digest::extract::HttpExtractor;
use kindle_digest::feed::HttpFeedProvider;
use kindle_digest::notify::EmailSender;
use kindle_digest::pipeline;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kindle_digest=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op when the vars come from the real
    // environment (CI secrets).
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = try_main().await {
        error!(error = ?e, "digest run failed");
        std::process::exit(1);
    }
}

async fn try_main() -> anyhow::Result<()> {
    let cfg = config::load_default()?;
    let account = config::MailAccount::from_env()?;

    info!(feeds = cfg.feeds.len(), "starting digest run");

    let provider = HttpFeedProvider::new();
    let extractor = HttpExtractor::new()?;
    let mailer = EmailSender::new(&cfg.smtp, &account, cfg.delivery.mode)?;

    let report = pipeline::run(&cfg, &provider, &extractor, &mailer).await?;

    info!(
        sections = report.sections,
        articles = report.articles_total,
        "all done, check the device in a few minutes"
    );
    Ok(())
}
