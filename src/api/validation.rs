use super::ApiError;
use crate::constants::messages;
use crate::models::user::is_valid_email;

/// Upper bound on a chat message, in characters.
const MAX_CHAT_MESSAGE_CHARS: usize = 4000;

pub fn validate_chat_message(message: Option<&str>) -> Result<&str, ApiError> {
    let message = message.map(str::trim).unwrap_or_default();

    if message.is_empty() {
        return Err(ApiError::validation(messages::EMPTY_MESSAGE));
    }

    if message.chars().count() > MAX_CHAT_MESSAGE_CHARS {
        return Err(ApiError::validation(format!(
            "Mensagem muito longa (máximo de {MAX_CHAT_MESSAGE_CHARS} caracteres)."
        )));
    }

    Ok(message)
}

pub fn validate_email(email: Option<&str>) -> Result<&str, ApiError> {
    let email = email.map(str::trim).unwrap_or_default();

    if !is_valid_email(email) {
        return Err(ApiError::validation(messages::INVALID_EMAIL));
    }

    Ok(email)
}

pub fn validate_credentials<'a>(
    login: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str), ApiError> {
    let login = login.map(str::trim).unwrap_or_default();
    let password = password.unwrap_or_default();

    if login.is_empty() || password.is_empty() {
        return Err(ApiError::validation(messages::LOGIN_REQUIRED));
    }

    Ok((login, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_chat_message() {
        assert_eq!(validate_chat_message(Some("  olá  ")).unwrap(), "olá");
        assert!(validate_chat_message(Some("   ")).is_err());
        assert!(validate_chat_message(None).is_err());

        let long = "a".repeat(MAX_CHAT_MESSAGE_CHARS + 1);
        assert!(validate_chat_message(Some(&long)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(Some(" ana@example.com ")).unwrap(),
            "ana@example.com"
        );
        assert!(validate_email(Some("not-an-email")).is_err());
        assert!(validate_email(None).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        assert_eq!(
            validate_credentials(Some(" ana "), Some("secret")).unwrap(),
            ("ana", "secret")
        );
        assert!(validate_credentials(Some("ana"), Some("")).is_err());
        assert!(validate_credentials(None, Some("secret")).is_err());
    }
}
