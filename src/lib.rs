// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod digest;
pub mod extract;
pub mod feed;
pub mod notify;
pub mod pipeline;
pub mod render;

// ---- Re-exports for stable public API ----
pub use crate::config::{DigestConfig, MailAccount};
pub use crate::digest::{Article, DigestDocument, FeedResult, FeedSource, TocEntry};
pub use crate::extract::{ArticleExtractor, HttpExtractor};
pub use crate::feed::{FeedProvider, HttpFeedProvider};
pub use crate::notify::{DeliveryMode, DigestMailer, EmailSender, OutboundDigest};
pub use crate::pipeline::{run, RunReport};
pub use crate::render::render;
