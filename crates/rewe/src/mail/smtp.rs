//! Direct SMTP transport.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::error::DispatchError;
use crate::mail::{MailTransport, SENDER_NAME};

/// Implicit-TLS submission port. Everything else negotiates STARTTLS.
const SMTPS_PORT: u16 = 465;

/// Submits the digest straight to a mail relay, authenticated with the
/// sender address and an app password.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpTransport {
    pub fn new(
        sender: &str,
        password: &str,
        host: &str,
        port: u16,
        recipient: &str,
    ) -> Result<Self, DispatchError> {
        let builder = if port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };
        let mailer = builder
            .port(port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();
        Ok(Self {
            mailer,
            sender: Mailbox::new(Some(SENDER_NAME.to_string()), sender.parse()?),
            recipient: Mailbox::new(None, recipient.parse()?),
        })
    }

    /// Multipart message: plain-text fallback first, HTML preferred.
    fn build_message(&self, subject: &str, html: &str, text: &str) -> Result<Message, DispatchError> {
        Ok(Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )?)
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, subject: &str, html: &str, text: &str) -> Result<(), DispatchError> {
        let message = self.build_message(subject, html, text)?;
        self.mailer.send(message).await?;
        debug!(recipient = %self.recipient, "smtp relay accepted the message");
        Ok(())
    }
}
