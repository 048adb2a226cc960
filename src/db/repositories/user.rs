use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};

use crate::config::SecurityConfig;
use crate::entities::users::{self, AccountKind};
use crate::models::user::{ProfessionalUpdate, Registration, UniqueField};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a registration whose password is already hashed.
    ///
    /// The raw [`DbErr`] is returned so callers can recognise unique violations.
    pub async fn insert(
        &self,
        registration: &Registration,
        password_hash: String,
    ) -> Result<i32, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut active = users::ActiveModel {
            email: Set(registration.email().to_string()),
            password_hash: Set(password_hash),
            kind: Set(registration.kind()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match registration {
            Registration::Patient { username, .. } => {
                active.username = Set(Some(username.clone()));
            }
            Registration::Professional { details, .. } => {
                active.full_name = Set(Some(details.full_name.clone()));
                active.license_number = Set(Some(details.license_number.clone()));
                active.age = Set(details.age);
                active.sex = Set(details.sex.clone());
                active.practice_area = Set(details.practice_area.clone());
                active.contact = Set(details.contact.clone());
                active.bio = Set(details.bio.clone());
            }
        }

        let inserted = active.insert(&self.conn).await?;
        Ok(inserted.id)
    }

    /// First unique field of the registration already held by another account.
    pub async fn find_taken_field(&self, registration: &Registration) -> Result<Option<UniqueField>> {
        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(registration.email()))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?
            .is_some();
        if email_taken {
            return Ok(Some(UniqueField::Email));
        }

        let (column, value, field) = match registration {
            Registration::Patient { username, .. } => {
                (users::Column::Username, username, UniqueField::Username)
            }
            Registration::Professional { details, .. } => (
                users::Column::LicenseNumber,
                &details.license_number,
                UniqueField::LicenseNumber,
            ),
        };

        let taken = users::Entity::find()
            .filter(column.eq(value.as_str()))
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query user by {field:?}"))?
            .is_some();

        Ok(taken.then_some(field))
    }

    /// Looks an account up by email when the login contains '@', by username otherwise.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<users::Model>> {
        let condition = if login.contains('@') {
            users::Column::Email.eq(login.to_lowercase())
        } else {
            users::Column::Username.eq(login)
        };

        let user = users::Entity::find()
            .filter(condition)
            .one(&self.conn)
            .await
            .context("Failed to query user by login")?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user)
    }

    /// Applies the update only to a professional account with this id.
    ///
    /// Returns `None` when no such row exists; nothing is written in that case.
    pub async fn update_professional(
        &self,
        update: &ProfessionalUpdate,
    ) -> Result<Option<users::Model>> {
        let mut statement = users::Entity::update_many()
            .col_expr(
                users::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(users::Column::Id.eq(update.id))
            .filter(users::Column::Kind.eq(AccountKind::Professional));

        if let Some(full_name) = &update.full_name {
            statement = statement.col_expr(users::Column::FullName, Expr::value(full_name.clone()));
        }
        if let Some(age) = update.age {
            statement = statement.col_expr(users::Column::Age, Expr::value(age));
        }
        if let Some(sex) = &update.sex {
            statement = statement.col_expr(users::Column::Sex, Expr::value(sex.clone()));
        }
        if let Some(area) = &update.practice_area {
            statement =
                statement.col_expr(users::Column::PracticeArea, Expr::value(area.clone()));
        }
        if let Some(contact) = &update.contact {
            statement = statement.col_expr(users::Column::Contact, Expr::value(contact.clone()));
        }
        if let Some(bio) = &update.bio {
            statement = statement.col_expr(users::Column::Bio, Expr::value(bio.clone()));
        }

        let result = statement
            .exec(&self.conn)
            .await
            .context("Failed to update professional profile")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_by_id(update.id).await
    }

    /// Stores the pre-assessment summary; false when the user does not exist.
    pub async fn set_assessment_summary(&self, id: i32, summary: &str) -> Result<bool> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::AssessmentSummary,
                Expr::value(summary.to_string()),
            )
            .col_expr(
                users::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to store assessment summary")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_professionals(&self) -> Result<Vec<users::Model>> {
        let rows = users::Entity::find()
            .filter(users::Column::Kind.eq(AccountKind::Professional))
            .order_by_asc(users::Column::FullName)
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list professionals")?;

        Ok(rows)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate's default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash; params are read from the hash itself.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("segredo", Some(&light_params())).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "segredo").unwrap());
        assert!(!verify_password(&hash, "Segredo").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same", Some(&light_params())).unwrap();
        let b = hash_password("same", Some(&light_params())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("not-a-hash", "x").is_err());
    }
}
