// SMTP DeliveryPort Implementation

use crate::config::{SmtpConfig, TlsMode};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use timemachine_core::domain::Message;
use timemachine_core::port::{DeliveryError, DeliveryPort};
use tracing::{debug, info};

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|_| DeliveryError::InvalidAddress(address.to_string()))
}

/// Sends each message as a plain-text reply in one mail thread
#[derive(Clone)]
pub struct SmtpDelivery {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    to: Mailbox,
    subject: String,
    thread_ref: String,
}

impl SmtpDelivery {
    /// Validate addresses and build the transport; no connection is made yet
    ///
    /// # Errors
    /// - `DeliveryError::InvalidAddress` for a malformed sender or recipient
    /// - `DeliveryError::Transport` if the TLS parameters cannot be built
    pub fn new(config: SmtpConfig) -> Result<Self, DeliveryError> {
        let from = parse_mailbox(config.sender())?;
        let to = parse_mailbox(&config.recipient)?;

        let builder = match config.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| DeliveryError::Transport(e.to_string()))?,
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| DeliveryError::Transport(e.to_string()))?,
        };

        let transport = builder
            .port(config.port)
            .timeout(Some(config.timeout))
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();

        info!(
            host = %config.host,
            port = config.port,
            tls = %config.tls,
            to = %to,
            "SMTP delivery configured"
        );

        Ok(Self {
            transport: Arc::new(transport),
            from,
            to,
            subject: config.subject,
            thread_ref: format!("<{}>", config.thread_id.trim_matches(|c| c == '<' || c == '>')),
        })
    }

    /// Assemble the outgoing mail for one message
    pub fn build_message(&self, message: &Message) -> Result<lettre::Message, DeliveryError> {
        lettre::Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .in_reply_to(self.thread_ref.clone())
            .references(self.thread_ref.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.as_str().to_string())
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

#[async_trait]
impl DeliveryPort for SmtpDelivery {
    async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        let email = self.build_message(message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        debug!(code = %response.code(), "Relay accepted message");
        Ok(())
    }
}
