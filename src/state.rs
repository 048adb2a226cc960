use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AssistantService, AuthService, GeminiAssistantService, MailService, ProfileService,
    SeaOrmAuthService, SeaOrmProfileService, SmtpMailService,
};

/// Long-lived handles shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub assistant: Arc<dyn AssistantService>,

    pub mail: Arc<dyn MailService>,

    pub auth_service: Arc<dyn AuthService>,

    pub profile_service: Arc<dyn ProfileService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        let assistant: Arc<dyn AssistantService> =
            Arc::new(GeminiAssistantService::new(&config.gemini)?);

        let smtp = Arc::new(SmtpMailService::new(&config.smtp));
        {
            let smtp = Arc::clone(&smtp);
            tokio::spawn(async move { smtp.verify().await });
        }

        Ok(Self::with_services(config, store, assistant, smtp))
    }

    /// Wires the domain services around externally built provider adapters.
    #[must_use]
    pub fn with_services(
        config: Config,
        store: Store,
        assistant: Arc<dyn AssistantService>,
        mail: Arc<dyn MailService>,
    ) -> Self {
        let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            Arc::clone(&mail),
        ));

        let profile_service: Arc<dyn ProfileService> = Arc::new(SeaOrmProfileService::new(
            store.clone(),
            Arc::clone(&assistant),
        ));

        Self {
            config: Arc::new(config),
            store,
            assistant,
            mail,
            auth_service,
            profile_service,
        }
    }
}
