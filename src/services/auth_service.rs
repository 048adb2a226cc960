//! Domain service for account registration and login.

use thiserror::Error;

use crate::models::user::{ProfileView, RegisterRequest, UniqueField};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Already in use: {0:?}")]
    Conflict(UniqueField),

    /// Duplicate whose column could not be identified.
    #[error("Account already exists")]
    DuplicateAccount,

    /// Same error for an unknown login and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] when the body misses a field its kind requires.
    /// Returns [`AuthError::Conflict`] when the email, username or license is taken.
    async fn register(&self, request: &RegisterRequest) -> Result<i32, AuthError>;

    /// Verifies a username-or-email and password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails, whatever the reason.
    async fn login(&self, login: &str, password: &str) -> Result<ProfileView, AuthError>;
}
