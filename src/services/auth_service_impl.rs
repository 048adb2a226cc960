//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use tokio::task;
use tracing::{debug, info, warn};

use crate::config::SecurityConfig;
use crate::db::{Store, hash_password, verify_password};
use crate::models::user::{ProfileView, RegisterRequest, UniqueField};
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::mail_service::{MailError, MailService};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    mail: Arc<dyn MailService>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig, mail: Arc<dyn MailService>) -> Self {
        Self {
            store,
            security,
            mail,
        }
    }

    /// Fire-and-forget: a slow or failing SMTP server never holds up registration.
    fn dispatch_welcome(&self, email: String) {
        let mail = Arc::clone(&self.mail);
        tokio::spawn(async move {
            match mail.send_welcome(&email).await {
                Ok(()) => {}
                Err(MailError::Disabled) => debug!("Skipping welcome email, mail is disabled"),
                Err(e) => warn!("Welcome email failed: {e}"),
            }
        });
    }
}

/// Maps an insert failure, turning unique violations into conflicts on the colliding field.
fn insert_error(err: DbErr) -> AuthError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            UniqueField::from_constraint_message(&message)
                .map_or(AuthError::DuplicateAccount, AuthError::Conflict)
        }
        _ => err.into(),
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, request: &RegisterRequest) -> Result<i32, AuthError> {
        let registration = request.validate().map_err(AuthError::Validation)?;

        if let Some(field) = self.store.find_taken_field(&registration).await? {
            return Err(AuthError::Conflict(field));
        }

        let password = registration.password().to_string();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        // A concurrent registration can still win the race past the pre-check
        let id = self
            .store
            .insert_user(&registration, password_hash)
            .await
            .map_err(insert_error)?;

        info!(user_id = id, kind = ?registration.kind(), "Account registered");
        self.dispatch_welcome(registration.email().to_string());

        Ok(id)
    }

    async fn login(&self, login: &str, password: &str) -> Result<ProfileView, AuthError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                crate::constants::messages::LOGIN_REQUIRED.to_string(),
            ));
        }

        let Some(user) = self.store.find_user_by_login(login).await? else {
            debug!("Login attempt for unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();
        let is_valid = task::spawn_blocking(move || verify_password(&password_hash, &password))
            .await
            .context("Password verification task panicked")??;

        if !is_valid {
            debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, "User logged in");
        Ok(ProfileView::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Registration;

    async fn temp_store() -> Store {
        let path = std::env::temp_dir().join(format!("mindflow-auth-{}.db", uuid::Uuid::new_v4()));
        Store::new(&format!("sqlite:{}", path.display()))
            .await
            .unwrap()
    }

    fn patient(username: &str, email: &str) -> Registration {
        Registration::Patient {
            username: username.to_string(),
            email: email.to_string(),
            password: "segredo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_unique_violation_maps_to_field_conflict() {
        let store = temp_store().await;
        store
            .insert_user(&patient("ana", "ana@example.com"), "hash".to_string())
            .await
            .unwrap();

        let err = store
            .insert_user(&patient("outra", "ana@example.com"), "hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            insert_error(err),
            AuthError::Conflict(UniqueField::Email)
        ));

        let err = store
            .insert_user(&patient("ana", "nova@example.com"), "hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            insert_error(err),
            AuthError::Conflict(UniqueField::Username)
        ));
    }

    #[test]
    fn test_non_constraint_error_stays_a_database_error() {
        let err = DbErr::Custom("boom".to_string());
        assert!(matches!(insert_error(err), AuthError::Database(_)));
    }
}
