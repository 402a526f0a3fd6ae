//! Mail dispatch.
//!
//! One capability trait, two transports: the Mailjet send API over HTTP and
//! direct SMTP submission. [`transport_for`] builds whichever one the
//! configuration names; the recipient is fixed at construction.

mod mailjet;
mod smtp;

use async_trait::async_trait;

use crate::config::TransportConfig;
use crate::error::DispatchError;

pub use mailjet::MailjetTransport;
pub use smtp::SmtpTransport;

/// Display name on the From header.
pub const SENDER_NAME: &str = "Reddit Weekly";

/// Delivers one rendered digest to the configured recipient.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Transport label for logs.
    fn name(&self) -> &'static str;

    /// Sends one message with an HTML body and a plain-text fallback.
    /// Fire-and-forget: a failure surfaces as [`DispatchError`], nothing
    /// retries or queues.
    async fn send(&self, subject: &str, html: &str, text: &str) -> Result<(), DispatchError>;
}

/// Builds the transport the configuration selects.
pub fn transport_for(
    config: &TransportConfig,
    recipient: &str,
) -> Result<Box<dyn MailTransport>, DispatchError> {
    match config {
        TransportConfig::Mailjet {
            api_key_public,
            api_key_private,
        } => Ok(Box::new(MailjetTransport::new(
            api_key_public.clone(),
            api_key_private.clone(),
            recipient.to_string(),
        )?)),
        TransportConfig::Smtp {
            sender,
            password,
            host,
            port,
        } => Ok(Box::new(SmtpTransport::new(
            sender, password, host, *port, recipient,
        )?)),
    }
}
