use serde::{Deserialize, Serialize};

/// Body of every failed response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
}

/// Clients send the identifier as `login`, `username` or `email`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// First non-blank identifier, in `login`, `username`, `email` order.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        [&self.login, &self.username, &self.email]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WelcomeEmailRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkMessage {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub message: String,
    pub resumo_pre_avaliacao: String,
}

#[derive(Debug, Serialize)]
pub struct DbStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora_atual_db: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhe: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_identifier_takes_first_non_blank() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"login": " ", "username": "ana", "email": "ana@example.com", "password": "x"}"#,
        )
        .unwrap();
        assert_eq!(request.identifier(), Some("ana"));

        let request: LoginRequest =
            serde_json::from_str(r#"{"email": "ana@example.com", "password": "x"}"#).unwrap();
        assert_eq!(request.identifier(), Some("ana@example.com"));

        let request: LoginRequest = serde_json::from_str(r#"{"password": "x"}"#).unwrap();
        assert_eq!(request.identifier(), None);
    }
}
