//! SMTP transport backed by lettre.
//!
//! Connectivity/auth is verified once, before the first send; the cached
//! outcome short-circuits every later send on failure. Attachments are
//! materialized to a temp file for the duration of one send and removed on
//! every exit path.

use crate::app::ports::{EmailTransport, OutboundEmail};
use crate::types::Provider;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::debug;

pub struct SmtpEmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    verified: OnceCell<Result<(), String>>,
    attachment_dir: PathBuf,
}

impl SmtpEmailTransport {
    pub fn new(host: &str, port: u16, user: &str, pass: &str) -> Result<Self, String> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| format!("invalid SMTP relay '{host}': {e}"))?
            .port(port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();
        Ok(Self {
            mailer,
            verified: OnceCell::new(),
            attachment_dir: std::env::temp_dir(),
        })
    }

    /// The SMTP path works from a filesystem reference: the artifact is
    /// written next to the send, read back into the message, and removed
    /// whether or not message building succeeds.
    async fn materialize_and_build(&self, email: &OutboundEmail) -> Result<Message, String> {
        match &email.attachment {
            Some(artifact) => {
                let path = self
                    .attachment_dir
                    .join(format!("{}-{}", uuid::Uuid::new_v4(), artifact.filename));
                tokio::fs::write(&path, &artifact.bytes)
                    .await
                    .map_err(|e| format!("failed to write attachment temp file: {e}"))?;
                let read_back = tokio::fs::read(&path)
                    .await
                    .map_err(|e| format!("failed to read attachment temp file: {e}"));
                let message = read_back.and_then(|bytes| Self::build_message(email, Some(bytes)));
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    debug!(path = %path.display(), error = %e, "failed to remove attachment temp file");
                }
                message
            }
            None => Self::build_message(email, None),
        }
    }

    fn build_message(email: &OutboundEmail, attachment_bytes: Option<Vec<u8>>) -> Result<Message, String> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|e| format!("invalid from address '{}': {e}", email.from))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| format!("invalid to address '{}': {e}", email.to))?;
        let builder = Message::builder().from(from).to(to).subject(email.subject.clone());

        match (&email.attachment, attachment_bytes) {
            (Some(artifact), Some(bytes)) => {
                let content_type = ContentType::parse(&artifact.content_type)
                    .map_err(|e| format!("invalid attachment content type: {e}"))?;
                let part = Attachment::new(artifact.filename.clone()).body(bytes, content_type);
                builder
                    .multipart(
                        MultiPart::mixed()
                            .singlepart(SinglePart::plain(email.body.clone()))
                            .singlepart(part),
                    )
                    .map_err(|e| e.to_string())
            }
            _ => builder.body(email.body.clone()).map_err(|e| e.to_string()),
        }
    }
}

#[async_trait]
impl EmailTransport for SmtpEmailTransport {
    fn provider(&self) -> Provider {
        Provider::Smtp
    }

    async fn verify(&self) -> Result<(), String> {
        self.verified
            .get_or_init(|| async {
                match self.mailer.test_connection().await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err("SMTP connection test was refused".to_string()),
                    Err(e) => Err(e.to_string()),
                }
            })
            .await
            .clone()
    }

    async fn send(&self, email: &OutboundEmail) -> Result<String, String> {
        let message = self.materialize_and_build(email).await?;
        let response = self.mailer.send(message).await.map_err(|e| e.to_string())?;
        Ok(response.message().collect::<Vec<&str>>().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentArtifact;

    fn email_with_attachment() -> OutboundEmail {
        OutboundEmail {
            from: "bookings@example.com".to_string(),
            to: "kitchen@example.com".to_string(),
            subject: "Preorder".to_string(),
            body: "Attached.".to_string(),
            attachment: Some(DocumentArtifact {
                filename: "preorder-summary.txt".to_string(),
                content_type: "text/plain".to_string(),
                bytes: b"Starters\n".to_vec(),
            }),
        }
    }

    #[test]
    fn builds_multipart_message_with_attachment() {
        let email = email_with_attachment();
        let message =
            SmtpEmailTransport::build_message(&email, Some(b"Starters\n".to_vec())).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("multipart/mixed"));
        assert!(rendered.contains("preorder-summary.txt"));
    }

    #[test]
    fn builds_plain_message_without_attachment() {
        let mut email = email_with_attachment();
        email.attachment = None;
        let message = SmtpEmailTransport::build_message(&email, None).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Attached."));
        assert!(!rendered.contains("multipart/mixed"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        let mut email = email_with_attachment();
        email.to = "not-an-address".to_string();
        assert!(SmtpEmailTransport::build_message(&email, None).is_err());
    }

    fn transport_with_dir(dir: &std::path::Path) -> SmtpEmailTransport {
        let mut transport =
            SmtpEmailTransport::new("smtp.example.com", 587, "user", "pass").unwrap();
        transport.attachment_dir = dir.to_path_buf();
        transport
    }

    fn dir_entry_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn attachment_temp_file_is_removed_after_building() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport_with_dir(dir.path());

        let message = transport
            .materialize_and_build(&email_with_attachment())
            .await
            .unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("preorder-summary.txt"));
        assert_eq!(dir_entry_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn attachment_temp_file_is_removed_when_building_fails() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport_with_dir(dir.path());

        let mut email = email_with_attachment();
        email.attachment.as_mut().unwrap().content_type = "not a content type".to_string();

        assert!(transport.materialize_and_build(&email).await.is_err());
        assert_eq!(dir_entry_count(dir.path()), 0);
    }
}
