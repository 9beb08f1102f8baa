use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, MailTransport, OutboundEmail};
use crate::workflows::screening::settings::EmailCredentials;

/// Authenticated SMTP submission over implicit TLS. A connection is opened per
/// message; sessions send at most a handful.
#[derive(Debug, Clone)]
pub struct SmtpMailTransport {
    host: String,
    port: u16,
}

impl SmtpMailTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(
        &self,
        credentials: &EmailCredentials,
        email: &OutboundEmail,
    ) -> Result<(), MailError> {
        let message = build_message(&credentials.sender, email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
            .map_err(|err| MailError::Transport(err.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.sender.clone(),
                credentials.app_password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;
        Ok(())
    }
}

pub(crate) fn build_message(sender: &str, email: &OutboundEmail) -> Result<Message, MailError> {
    let from = parse_mailbox(sender)?;
    let to = parse_mailbox(&email.to)?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|err| MailError::Message(err.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|err| MailError::Address {
            address: address.to_string(),
            reason: err.to_string(),
        })
}
