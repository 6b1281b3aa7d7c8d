use std::sync::Mutex;

use crate::error::MailError;
use crate::traits::{Email, Mailer};

/// MemoryMailer records every message instead of sending it (useful for tests).
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<Email>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far, in send order.
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(email.clone());
        Ok(())
    }
}
