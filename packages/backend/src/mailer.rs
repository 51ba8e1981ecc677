//! Outgoing mail. Only password-reset links are ever sent.

use std::sync::{Arc, Mutex};

use crate::error::{BackendError, Result};

/// Delivers password-reset links.
pub trait Mailer: Send + Sync {
    fn send_password_reset(&self, email: &str, link: &str) -> Result<()>;
}

/// Writes reset links to the log instead of delivering them.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_password_reset(&self, email: &str, link: &str) -> Result<()> {
        tracing::info!(%email, %link, "Password reset requested");
        Ok(())
    }
}

/// A sent message, as recorded by [`MemoryMailer`].
#[derive(Clone, Debug, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub link: String,
}

/// Keeps every message in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<SentMail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

impl Mailer for MemoryMailer {
    fn send_password_reset(&self, email: &str, link: &str) -> Result<()> {
        self.outbox
            .lock()
            .map_err(|e| BackendError::Mail(e.to_string()))?
            .push(SentMail {
                to: email.to_string(),
                link: link.to_string(),
            });
        Ok(())
    }
}

/// Append the reset code to the redirect URL.
pub(crate) fn reset_link(redirect_to: &str, code: &str) -> String {
    let separator = if redirect_to.contains('?') { '&' } else { '?' };
    format!("{redirect_to}{separator}code={code}")
}
