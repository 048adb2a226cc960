use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod assessment;
pub mod auth;
mod chat;
mod error;
mod mail;
mod observability;
mod profiles;
pub mod rate_limit;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use types::*;

use crate::db::Store;
use crate::services::{AssistantService, AuthService, MailService, ProfileService};

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    /// `None` when throttling is disabled in the configuration.
    pub rate_limiter: Option<Arc<RateLimiter>>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn profile_service(&self) -> &Arc<dyn ProfileService> {
        &self.shared.profile_service
    }

    #[must_use]
    pub fn assistant(&self) -> &Arc<dyn AssistantService> {
        &self.shared.assistant
    }

    #[must_use]
    pub fn mail(&self) -> &Arc<dyn MailService> {
        &self.shared.mail
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let rate_limit = &shared.config.server.rate_limit;
    let rate_limiter = rate_limit
        .enabled
        .then(|| Arc::new(RateLimiter::from_config(rate_limit)));

    Arc::new(AppState {
        shared,
        rate_limiter,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config();
    let static_dir = config.server.static_dir.clone();
    let cors_origins = &config.server.cors_allowed_origins;

    let api_router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/register-email", post(mail::send_welcome_email))
        .route("/perfil-profissional", put(profiles::update_professional))
        .route("/profissionais", get(profiles::list_professionals))
        .route("/questionario", post(assessment::submit_assessment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit,
        ));

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/chat", post(chat::chat))
        .route("/db-status", get(system::db_status))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}
