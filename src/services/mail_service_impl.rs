//! SMTP implementation of the `MailService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::clients::smtp::SmtpClient;
use crate::config::SmtpConfig;
use crate::models::user::is_valid_email;
use crate::services::mail_service::{MailError, MailService, welcome_mail};

pub struct SmtpMailService {
    client: Option<SmtpClient>,
}

impl SmtpMailService {
    /// Builds the transport; mail stays disabled when SMTP is off, has no
    /// credentials, or has no valid sender address.
    #[must_use]
    pub fn new(config: &SmtpConfig) -> Self {
        if !config.is_usable() {
            warn!("SMTP not configured, welcome emails are disabled");
            return Self { client: None };
        }

        match SmtpClient::new(config) {
            Ok(client) => Self {
                client: Some(client),
            },
            Err(e) => {
                warn!("SMTP setup failed, welcome emails are disabled: {e:#}");
                Self { client: None }
            }
        }
    }

    /// Logs whether the SMTP server accepts our credentials. Never fails startup.
    pub async fn verify(&self) {
        let Some(client) = &self.client else {
            return;
        };

        match client.verify().await {
            Ok(true) => info!("SMTP connected"),
            Ok(false) => warn!("SMTP server rejected the connection test"),
            Err(e) => warn!("SMTP connection error: {e:#}"),
        }
    }
}

#[async_trait]
impl MailService for SmtpMailService {
    async fn send_welcome(&self, email: &str) -> Result<(), MailError> {
        let client = self.client.as_ref().ok_or(MailError::Disabled)?;

        if !is_valid_email(email) {
            return Err(MailError::InvalidRecipient(email.to_string()));
        }

        client.send(welcome_mail(email)).await?;
        info!("Welcome email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_address_sender_disables_mail() {
        let config = SmtpConfig {
            username: "apikey".to_string(),
            password: "secret".to_string(),
            ..SmtpConfig::default()
        };

        let service = SmtpMailService::new(&config);
        assert!(matches!(
            service.send_welcome("ana@example.com").await,
            Err(MailError::Disabled)
        ));
    }

    #[tokio::test]
    async fn test_missing_credentials_disable_mail() {
        let service = SmtpMailService::new(&SmtpConfig::default());
        assert!(matches!(
            service.send_welcome("ana@example.com").await,
            Err(MailError::Disabled)
        ));
    }
}
