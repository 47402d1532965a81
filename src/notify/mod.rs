// src/notify/mod.rs
//! Delivery of the rendered digest to the device inbox.

pub mod email;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

pub use email::EmailSender;

/// How the HTML travels: as the message body, or as a named `.html` file
/// attached to a short plain-text message. Attachment is the primary mode;
/// it survives recipient-side HTML rendering quirks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Inline,
    #[default]
    Attachment,
}

/// One rendered digest ready to send.
#[derive(Debug, Clone)]
pub struct OutboundDigest {
    pub subject: String,
    pub html: String,
    pub generated_at: NaiveDate,
}

impl OutboundDigest {
    pub fn new(html: String, generated_at: NaiveDate) -> Self {
        let subject = format!("Daily News Digest - {}", generated_at.format("%B %d, %Y"));
        Self {
            subject,
            html,
            generated_at,
        }
    }

    /// Attachment filename, dated so successive digests don't collide on the
    /// device.
    pub fn attachment_filename(&self) -> String {
        format!(
            "Daily News Digest {}.html",
            self.generated_at.format("%d-%m-%Y")
        )
    }
}

#[async_trait]
pub trait DigestMailer: Send + Sync {
    /// Send one digest to the configured recipient. A failure here is the
    /// run's overall failure; the pipeline does not retry.
    async fn send(&self, digest: &OutboundDigest) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_and_filename_derive_from_the_date() {
        let d = OutboundDigest::new(
            "<html></html>".to_string(),
            NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
        );
        assert_eq!(d.subject, "Daily News Digest - August 04, 2025");
        assert_eq!(d.attachment_filename(), "Daily News Digest 04-08-2025.html");
    }
}
