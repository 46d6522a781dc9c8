//! Outbound mail relay
//!
//! One STARTTLS connection per request, authenticated with the static relay
//! credential, exactly one message submitted. No pooling, no batching, no
//! retry on transient relay failure.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    transport::smtp::Error as SmtpError,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};

/// One email to relay
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub html: bool,
}

/// Mail relay client built from the static SMTP configuration
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
    port: u16,
}

impl Mailer {
    /// Build a relay client; `None` when credentials are not configured.
    pub fn from_config(config: &SmtpConfig) -> AppResult<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }
        let username = config.username.clone().unwrap_or_default();
        let password = config.password.clone().unwrap_or_default();

        let from = username
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid relay username: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(config.host())
            .map_err(|e| AppError::Configuration(format!("Invalid relay host: {e}")))?
            .port(config.port())
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Some(Self {
            transport,
            from,
            host: config.host().to_string(),
            port: config.port(),
        }))
    }

    /// Relay one message. The recipient is parsed before any connection is
    /// made, so a malformed address never reaches the relay.
    pub async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {e}")))?;

        let content_type = if message.html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(content_type)
            .body(message.body.clone())
            .map_err(|e| AppError::RelayTransport(format!("Failed to build message: {e}")))?;

        tracing::info!("Connecting to {}:{}", self.host, self.port);
        self.transport.send(email).await.map_err(classify_error)?;

        tracing::info!("Email sent successfully to {}", message.to);
        Ok(())
    }
}

/// Map a relay failure onto the error taxonomy: the 53x authentication
/// replies mean the static credential was rejected, everything else is a
/// transport failure.
fn classify_error(err: SmtpError) -> AppError {
    let auth_rejected = err
        .status()
        .map(|code| matches!(code.to_string().as_str(), "530" | "534" | "535"))
        .unwrap_or(false);

    if auth_rejected {
        AppError::RelayAuth
    } else {
        AppError::RelayTransport(err.to_string())
    }
}
