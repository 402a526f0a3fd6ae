//! Mailjet HTTP transport.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::DispatchError;
use crate::mail::{MailTransport, SENDER_NAME};
use crate::reddit::REQUEST_TIMEOUT;

/// Mailjet v3.1 send endpoint.
const MAILJET_SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

/// Sends through the Mailjet send API, authenticated with the API key pair.
/// The From address is the recipient itself: the digest mails its operator.
pub struct MailjetTransport {
    http: reqwest::Client,
    api_key_public: String,
    api_key_private: String,
    recipient: String,
    endpoint: String,
}

impl MailjetTransport {
    pub fn new(
        api_key_public: String,
        api_key_private: String,
        recipient: String,
    ) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key_public,
            api_key_private,
            recipient,
            endpoint: MAILJET_SEND_URL.to_string(),
        })
    }

    /// Points the transport at a different endpoint. Used by tests.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    fn build_payload<'a>(
        &'a self,
        subject: &'a str,
        html: &'a str,
        text: &'a str,
    ) -> SendRequest<'a> {
        SendRequest {
            messages: vec![OutgoingMessage {
                from: Address {
                    email: &self.recipient,
                    name: Some(SENDER_NAME),
                },
                to: vec![Address {
                    email: &self.recipient,
                    name: None,
                }],
                subject,
                html_part: html,
                text_part: text,
            }],
        }
    }
}

// ===== Mailjet API types =====

#[derive(Serialize)]
struct SendRequest<'a> {
    #[serde(rename = "Messages")]
    messages: Vec<OutgoingMessage<'a>>,
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    #[serde(rename = "From")]
    from: Address<'a>,
    #[serde(rename = "To")]
    to: Vec<Address<'a>>,
    #[serde(rename = "Subject")]
    subject: &'a str,
    #[serde(rename = "HTMLPart")]
    html_part: &'a str,
    #[serde(rename = "TextPart")]
    text_part: &'a str,
}

#[derive(Serialize)]
struct Address<'a> {
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[async_trait]
impl MailTransport for MailjetTransport {
    fn name(&self) -> &'static str {
        "mailjet"
    }

    async fn send(&self, subject: &str, html: &str, text: &str) -> Result<(), DispatchError> {
        let payload = self.build_payload(subject, html, text);
        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.api_key_public, Some(&self.api_key_private))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Api {
                status: status.as_u16(),
                body,
            });
        }
        debug!(recipient = %self.recipient, "mailjet accepted the message");
        Ok(())
    }
}
