//! Notification dispatch: one transport per deployment, one independently
//! recorded outcome per attempt.

use crate::app::ports::{EmailTransport, OutboundEmail};
use crate::config::Config;
use crate::error::{BookingError, Result};
use crate::infra::http_email::HttpEmailTransport;
use crate::infra::smtp_email::SmtpEmailTransport;
use crate::types::{DocumentArtifact, NotificationAttempt, NotificationKind};
use std::sync::Arc;
use tracing::{info, warn};

/// Picks the transport for this deployment: HTTP email API when a key is
/// configured, SMTP otherwise. The choice is static; a failed send is not
/// retried on the other provider.
pub fn transport_from_config(config: &Config) -> Result<Arc<dyn EmailTransport>> {
    match &config.http_email_api_key {
        Some(key) if !key.is_empty() => Ok(Arc::new(HttpEmailTransport::new(
            key.clone(),
            config.http_email_endpoint.clone(),
        ))),
        _ => {
            if config.smtp_host.is_empty() {
                return Err(BookingError::Config(
                    "neither http_email_api_key nor smtp_host is configured".to_string(),
                ));
            }
            let transport = SmtpEmailTransport::new(
                &config.smtp_host,
                config.smtp_port,
                &config.smtp_user,
                &config.smtp_pass,
            )
            .map_err(BookingError::Config)?;
            Ok(Arc::new(transport))
        }
    }
}

pub struct NotificationDispatcher {
    transport: Arc<dyn EmailTransport>,
    from_address: String,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn EmailTransport>, from_address: String) -> Self {
        Self { transport, from_address }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(transport_from_config(config)?, config.from_address.clone()))
    }

    /// Attempts one send and folds the outcome, success or failure, into an
    /// attempt record. Transport errors never propagate past here.
    pub async fn send(
        &self,
        kind: NotificationKind,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<&DocumentArtifact>,
    ) -> NotificationAttempt {
        let provider = self.transport.provider();

        // The SMTP transport verifies connectivity before its first send; a
        // verification failure fails the attempt without trying delivery.
        if let Err(error) = self.transport.verify().await {
            warn!(kind = kind.as_str(), %error, "transport verification failed");
            metrics::counter!("notifications_failed_total", "kind" => kind.as_str()).increment(1);
            return NotificationAttempt {
                kind,
                success: false,
                provider,
                detail: format!("transport verification failed: {error}"),
            };
        }

        let email = OutboundEmail {
            from: self.from_address.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachment: attachment.cloned(),
        };

        match self.transport.send(&email).await {
            Ok(message_id) => {
                info!(kind = kind.as_str(), to = %to, %message_id, "notification sent");
                metrics::counter!("notifications_sent_total", "kind" => kind.as_str()).increment(1);
                NotificationAttempt { kind, success: true, provider, detail: message_id }
            }
            Err(error) => {
                warn!(kind = kind.as_str(), to = %to, %error, "notification failed");
                metrics::counter!("notifications_failed_total", "kind" => kind.as_str()).increment(1);
                NotificationAttempt { kind, success: false, provider, detail: error }
            }
        }
    }
}
