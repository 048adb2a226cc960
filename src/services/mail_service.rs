//! Domain service for transactional email.

use thiserror::Error;

use crate::clients::smtp::OutgoingMail;
use crate::constants::mail;

/// Errors specific to mail operations.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail delivery is not configured")]
    Disabled,

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl From<anyhow::Error> for MailError {
    fn from(err: anyhow::Error) -> Self {
        Self::Delivery(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait MailService: Send + Sync {
    /// Sends the "registration confirmed" message to a new address.
    async fn send_welcome(&self, email: &str) -> Result<(), MailError>;
}

/// Renders the welcome message in both plain-text and HTML form.
#[must_use]
pub fn welcome_mail(email: &str) -> OutgoingMail {
    let escaped = html_escape::encode_text(email);

    OutgoingMail {
        to: email.to_string(),
        subject: mail::WELCOME_SUBJECT.to_string(),
        text: format!(
            "Olá!\n\nSeu e-mail {email} foi registrado com sucesso no MindFlow.\n\n\
             Se não foi você, ignore este e-mail.\n\nAbraços,\nEquipe MindFlow"
        ),
        html: format!(
            "<p>Olá!</p>\
             <p>Seu e-mail <strong>{escaped}</strong> foi registrado com sucesso no <strong>MindFlow</strong>.</p>\
             <p>Se não foi você, ignore este e-mail.</p>\
             <p>Abraços,<br/>Equipe MindFlow</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_mail() {
        let message = welcome_mail("ana@exemplo.com");
        assert_eq!(message.to, "ana@exemplo.com");
        assert_eq!(message.subject, mail::WELCOME_SUBJECT);
        assert!(message.text.contains("ana@exemplo.com"));
        assert!(message.html.contains("<strong>ana@exemplo.com</strong>"));
    }

    #[test]
    fn test_welcome_mail_escapes_html() {
        let message = welcome_mail("<b>x</b>@y.com");
        assert!(message.html.contains("&lt;b&gt;x&lt;/b&gt;@y.com"));
        assert!(!message.html.contains("<b>x</b>"));
    }
}
