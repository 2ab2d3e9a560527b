//! Port for outbound email delivery.
//!
//! Delivery is consumed only through this contract; callers treat every
//! send as best-effort and never retry.

use async_trait::async_trait;

use crate::domain::notifications::EmailMessage;

/// Errors raised by mailer adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailerError {
    /// The relay rejected or failed to accept the message.
    #[error("mail relay send failed: {message}")]
    Send { message: String },
}

impl MailerError {
    pub fn send(message: impl Into<String>) -> Self {
        Self::Send {
            message: message.into(),
        }
    }
}

/// Port for handing a message to the mail relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one message to the relay.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}

/// Mailer that drops every message; used when no relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMailer;

#[async_trait]
impl Mailer for NoOpMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), MailerError> {
        Ok(())
    }
}
