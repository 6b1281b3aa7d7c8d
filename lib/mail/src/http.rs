use serde::Serialize;

use crate::error::MailError;
use crate::traits::{Email, Mailer};

/// HttpMailer delivers mail through a hosted transactional-email HTTP API.
///
/// The provider contract is a single JSON POST with bearer auth; anything
/// other than a 2xx response is reported as `MailError::Provider`.
pub struct HttpMailer {
    endpoint: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_name: Option<&'a str>,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from: from.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let payload = SendRequest {
            from: &self.from,
            to: &email.to,
            to_name: email.to_name.as_deref(),
            subject: &email.subject,
            text: &email.body,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Provider { status, body });
        }

        tracing::debug!("mail accepted by provider for {}", email.to);
        Ok(())
    }
}
