use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Outbound mail. Every caller treats delivery as best-effort: the write
/// that preceded it has already been committed, so failures are only
/// logged. Without EMAIL_USER/EMAIL_PASS the transport stays disabled and
/// sends are skipped.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    pub fn from_config(config: &AppConfig) -> Result<Self, MailerError> {
        let transport = match (&config.email_user, &config.email_pass) {
            (Some(user), Some(pass)) => {
                let credentials = Credentials::new(user.clone(), pass.clone());
                Some(
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay)?
                        .credentials(credentials)
                        .build(),
                )
            }
            _ => {
                log::warn!("EMAIL_USER/EMAIL_PASS not set, outbound mail disabled");
                None
            }
        };
        Ok(Mailer {
            transport,
            from: config.email_user.clone().unwrap_or_default(),
        })
    }

    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), MailerError> {
        let Some(transport) = &self.transport else {
            log::info!("mail disabled, skipping \"{}\" to {}", subject, to);
            return Ok(());
        };
        let from: Mailbox = self.from.parse()?;
        let to: Mailbox = to.parse()?;
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body)?;
        transport.send(message).await?;
        Ok(())
    }

    /// Fire-and-forget variant used after a successful write.
    pub async fn send_best_effort(&self, to: &str, subject: &str, body: String) {
        if let Err(e) = self.send(to, subject, body).await {
            log::error!("failed to send \"{}\" to {}: {}", subject, to, e);
        }
    }
}
