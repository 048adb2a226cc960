use anyhow::{Context, Result};
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};

use crate::config::SmtpConfig;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Clone)]
pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpClient {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        // Port 465 speaks TLS from the first byte; anything else upgrades with STARTTLS
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .with_context(|| format!("Invalid SMTP host: {}", config.host))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let sender = config.sender_address();
        let address: Address = sender
            .parse()
            .with_context(|| format!("SMTP sender is not an address: {sender}"))?;

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.sender_name.clone()), address),
        })
    }

    /// Opens a connection and authenticates without sending anything.
    pub async fn verify(&self) -> Result<bool> {
        self.transport
            .test_connection()
            .await
            .context("SMTP connection test failed")
    }

    pub async fn send(&self, mail: OutgoingMail) -> Result<()> {
        let to: Mailbox = mail
            .to
            .parse()
            .with_context(|| format!("Invalid recipient: {}", mail.to))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
            .context("Failed to build email")?;

        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(username: &str, from_address: &str) -> SmtpConfig {
        SmtpConfig {
            username: username.to_string(),
            password: "secret".to_string(),
            from_address: from_address.to_string(),
            ..SmtpConfig::default()
        }
    }

    #[test]
    fn test_sender_falls_back_to_username() {
        let client = SmtpClient::new(&config("equipe@mindflow.app", "")).unwrap();
        assert_eq!(client.from.email.to_string(), "equipe@mindflow.app");
    }

    #[test]
    fn test_explicit_sender_for_token_logins() {
        let client = SmtpClient::new(&config("apikey", "no-reply@mindflow.app")).unwrap();
        assert_eq!(client.from.email.to_string(), "no-reply@mindflow.app");

        assert!(SmtpClient::new(&config("apikey", "")).is_err());
    }
}
