use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SmtpSettings;
use crate::error::AppError;
use crate::logger::sanitize_for_log;
use crate::traits::AlertNotifier;

const MAX_RECIPIENT_LEN: usize = 254;

/// Send failures, categorized. Never fatal to the monitoring loop; the
/// caller logs and moves on.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("smtp authentication failed: {0}")]
    Auth(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("smtp protocol failure: {0}")]
    Protocol(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug)]
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl EmailNotifier {
    /// Builds a STARTTLS transport from the settings. Misconfiguration is an
    /// operation-level error surfaced before monitoring starts.
    pub fn new(settings: &SmtpSettings) -> Result<Self, AppError> {
        let sender: Mailbox = format!("Price Alerts <{}>", settings.sender)
            .parse()
            .map_err(|e| {
                AppError::Operation(format!(
                    "SMTP_SENDER '{}' is not a valid address: {}",
                    sanitize_for_log(&settings.sender),
                    e
                ))
            })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            .map_err(|e| AppError::Operation(format!("SMTP transport setup failed: {}", e)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        info!(
            "Email notifier ready - server: {}, port: {}, sender: {}",
            settings.server, settings.port, settings.sender
        );

        Ok(Self { transport, sender })
    }

    fn validate_parameters(to: &str, subject: &str, body: &str) -> Result<(), DispatchError> {
        if to.trim().is_empty() {
            return Err(DispatchError::Other(
                "destination address must not be empty".to_string(),
            ));
        }
        if !to.contains('@') || to.chars().count() > MAX_RECIPIENT_LEN {
            return Err(DispatchError::Other(format!(
                "'{}' is not a valid destination address",
                sanitize_for_log(to)
            )));
        }
        if subject.trim().is_empty() {
            return Err(DispatchError::Other("subject must not be empty".to_string()));
        }
        if body.trim().is_empty() {
            return Err(DispatchError::Other("body must not be empty".to_string()));
        }
        Ok(())
    }

    fn classify(err: lettre::transport::smtp::Error) -> DispatchError {
        let text = sanitize_for_log(&err.to_string());
        if err.is_timeout() {
            return DispatchError::Network(text);
        }
        if err.is_permanent() || err.is_transient() {
            let lower = text.to_lowercase();
            if lower.contains("535") || lower.contains("authentication") || lower.contains("credentials") {
                return DispatchError::Auth(text);
            }
            return DispatchError::Protocol(text);
        }
        if err.is_client() {
            return DispatchError::Other(text);
        }
        // Connection-level failures (refused, reset, TLS) land here.
        DispatchError::Network(text)
    }
}

#[async_trait]
impl AlertNotifier for EmailNotifier {
    async fn send_alert(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError> {
        Self::validate_parameters(to, subject, body)?;

        let recipient: Mailbox = to.parse().map_err(|e| {
            DispatchError::Other(format!(
                "'{}' is not a valid destination address: {}",
                sanitize_for_log(to),
                e
            ))
        })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| DispatchError::Other(format!("message construction failed: {}", e)))?;

        debug!("Sending alert email to {}", to);
        self.transport.send(message).await.map_err(Self::classify)?;
        Ok(())
    }
}
