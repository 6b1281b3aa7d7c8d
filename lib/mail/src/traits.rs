use crate::error::MailError;

/// An outbound email message.
#[derive(Debug, Clone)]
pub struct Email {
    /// Recipient address.
    pub to: String,
    /// Recipient display name, if known.
    pub to_name: Option<String>,
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Mailer is the transactional-email boundary.
///
/// The default implementation (`HttpMailer`) POSTs to a hosted email API.
/// Delivery is a secondary channel: callers that must not fail on mail
/// errors catch the returned `MailError` at the call site.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message. Errors describe the failed attempt; no retry is
    /// performed at this layer.
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Mailer that silently drops every message.
///
/// Used when no email provider is configured.
pub struct NoopMailer;

#[async_trait::async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, _email: &Email) -> Result<(), MailError> {
        Ok(())
    }
}
