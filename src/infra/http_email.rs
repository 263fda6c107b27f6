//! HTTP email API transport (Resend-style JSON endpoint).

use crate::app::ports::{EmailTransport, OutboundEmail};
use crate::types::Provider;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};

pub struct HttpEmailTransport {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl HttpEmailTransport {
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
        }
    }
}

#[async_trait]
impl EmailTransport for HttpEmailTransport {
    fn provider(&self) -> Provider {
        Provider::Http
    }

    async fn send(&self, email: &OutboundEmail) -> Result<String, String> {
        let mut payload = json!({
            "from": email.from,
            "to": [email.to],
            "subject": email.subject,
            "text": email.body,
        });
        if let Some(attachment) = &email.attachment {
            // The HTTP provider takes attachments base64-encoded inline.
            payload["attachments"] = json!([{
                "filename": attachment.filename,
                "content": BASE64.encode(&attachment.bytes),
                "content_type": attachment.content_type,
            }]);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("no error detail");
            return Err(format!("email API returned {status}: {message}"));
        }
        Ok(body
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string())
    }
}
