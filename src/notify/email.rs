use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header, Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{DeliveryMode, DigestMailer, OutboundDigest};
use crate::config::{MailAccount, SmtpConfig};

const ATTACHMENT_BODY_TEXT: &str = "Your daily news digest is attached.";

/// Sends the digest over one authenticated STARTTLS session per run.
pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    mode: DeliveryMode,
}

impl EmailSender {
    pub fn new(smtp: &SmtpConfig, account: &MailAccount, mode: DeliveryMode) -> Result<Self> {
        let creds = Credentials::new(account.sender.clone(), account.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .with_context(|| format!("invalid smtp relay host {}", smtp.host))?
            .port(smtp.port)
            .credentials(creds)
            .build();

        let from = account
            .sender
            .parse()
            .with_context(|| format!("invalid sender address {}", account.sender))?;
        let to = account
            .recipient
            .parse()
            .with_context(|| format!("invalid recipient address {}", account.recipient))?;

        Ok(Self {
            mailer,
            from,
            to,
            mode,
        })
    }

    fn build_message(&self, digest: &OutboundDigest) -> Result<Message> {
        let builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(digest.subject.clone());

        let msg = match self.mode {
            DeliveryMode::Inline => builder
                .header(header::ContentType::TEXT_HTML)
                .body(digest.html.clone()),
            DeliveryMode::Attachment => builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(ATTACHMENT_BODY_TEXT.to_string()))
                    .singlepart(
                        Attachment::new(digest.attachment_filename())
                            .body(digest.html.clone(), header::ContentType::TEXT_HTML),
                    ),
            ),
        };
        msg.context("building digest email")
    }
}

#[async_trait]
impl DigestMailer for EmailSender {
    async fn send(&self, digest: &OutboundDigest) -> Result<()> {
        let msg = self.build_message(digest)?;
        self.mailer.send(msg).await.context("sending digest email")?;
        tracing::info!(to = %self.to, subject = %digest.subject, "digest sent");
        Ok(())
    }
}
