use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::users;
use crate::models::user::{ProfessionalUpdate, Registration, UniqueField};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{hash_password, verify_password};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // SQLite files are created on demand so local runs need no setup
        if let Some(path_str) = db_url.strip_prefix("sqlite:")
            && !path_str.starts_with(":memory:")
        {
            let path_str = path_str.trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// The database server's own clock, as text.
    pub async fn current_timestamp(&self) -> Result<String> {
        let backend = self.conn.get_database_backend();
        let row = self
            .conn
            .query_one(Statement::from_string(
                backend,
                "SELECT CAST(CURRENT_TIMESTAMP AS TEXT) AS now".to_string(),
            ))
            .await?
            .ok_or_else(|| anyhow::anyhow!("Timestamp query returned no rows"))?;

        Ok(row.try_get::<String>("", "now")?)
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn insert_user(
        &self,
        registration: &Registration,
        password_hash: String,
    ) -> Result<i32, DbErr> {
        self.user_repo().insert(registration, password_hash).await
    }

    pub async fn find_taken_field(&self, registration: &Registration) -> Result<Option<UniqueField>> {
        self.user_repo().find_taken_field(registration).await
    }

    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<users::Model>> {
        self.user_repo().find_by_login(login).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn update_professional(
        &self,
        update: &ProfessionalUpdate,
    ) -> Result<Option<users::Model>> {
        self.user_repo().update_professional(update).await
    }

    pub async fn set_assessment_summary(&self, id: i32, summary: &str) -> Result<bool> {
        self.user_repo().set_assessment_summary(id, summary).await
    }

    pub async fn list_professionals(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list_professionals().await
    }
}
