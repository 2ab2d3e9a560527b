//! HTTP mail-relay adapter for the `Mailer` port.
//!
//! The relay is an external collaborator consumed only through this
//! request/response contract: one JSON POST per message, no retries.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::domain::notifications::EmailMessage;
use crate::domain::ports::{Mailer, MailerError};

/// Wire payload accepted by the relay.
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Mailer that posts each message to an HTTP relay endpoint.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: Url,
    sender: String,
}

impl HttpMailer {
    /// Create a new mailer for the given relay endpoint and sender address.
    pub fn new(relay_url: Url, sender: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let payload = RelayMessage {
            from: &self.sender,
            to: &message.to,
            subject: &message.subject,
            body: &message.body,
        };

        let response = self
            .client
            .post(self.relay_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| MailerError::send(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(MailerError::send(format!(
                "relay returned {}",
                response.status()
            )))
        }
    }
}
