use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::SmtpSettings;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid email address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error("Notification task failed: {0}")]
    Task(String),
}

/// Who to greet after a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationNotice {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegistrationNotice {
    pub fn subject(&self) -> &'static str {
        "Welcome to RentCar"
    }

    pub fn body(&self) -> String {
        format!(
            "Hello {} {},\n\nYour RentCar account has been created. \
             You can now sign in with your phone number and start saving favorite cars.\n\n\
             The RentCar team",
            self.first_name, self.last_name
        )
    }
}

/// Outbound channel for registration notices
#[async_trait]
pub trait RegistrationNotifier: Send + Sync {
    async fn send_registration_notice(&self, notice: &RegistrationNotice) -> Result<(), NotifyError>;
}

/// Notifier used when no SMTP relay is configured
pub struct LoggingNotifier;

#[async_trait]
impl RegistrationNotifier for LoggingNotifier {
    async fn send_registration_notice(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        info!(
            email = %notice.email,
            subject = notice.subject(),
            "SMTP not configured, registration notice logged only"
        );
        Ok(())
    }
}

/// Sends registration notices through an authenticated SMTP relay
pub struct SmtpNotifier {
    mailer: Arc<SmtpTransport>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&settings.from)?;

        let mailer = SmtpTransport::relay(&settings.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .port(settings.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        Ok(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    fn build_message(&self, notice: &RegistrationNotice) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&notice.email)?)
            .subject(notice.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl RegistrationNotifier for SmtpNotifier {
    #[instrument(skip(self, notice), fields(email = %notice.email))]
    async fn send_registration_notice(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        let message = self.build_message(notice)?;
        let mailer = Arc::clone(&self.mailer);

        // SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| NotifyError::Task(e.to_string()))?
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        debug!("Registration notice sent over SMTP");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}
