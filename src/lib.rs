pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Commands};
pub use config::Config;
use db::Store;

pub async fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    init_tracing(&config)?;

    match command {
        Commands::Serve => {
            config.validate()?;
            run_server(config).await
        }
        Commands::Migrate => run_migrations(&config).await,
        Commands::CheckConfig => check_config(&config),
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json = config.general.log_format.eq_ignore_ascii_case("json");

    let loki_layer = if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "mindflow")?
            .extra_field("env", "production")?
            .build_url(url)?;

        tokio::spawn(task);
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .with(loki_layer)
        .try_init()
        .context("Failed to initialize tracing")?;

    if config.observability.loki_enabled {
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    }

    Ok(())
}

fn init_metrics(
    config: &Config,
) -> anyhow::Result<Option<metrics_exporter_prometheus::PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");
    Ok(Some(handle))
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let prometheus_handle = init_metrics(&config)?;
    let port = config.server.port;

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on port {}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn run_migrations(config: &Config) -> anyhow::Result<()> {
    if config.database.url.trim().is_empty() {
        anyhow::bail!("DATABASE_URL is not set");
    }

    // Connecting applies any pending migration
    let store = Store::new(&config.database.url).await?;
    store.ping().await?;
    info!("Database schema is up to date");
    Ok(())
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    let rendered =
        toml::to_string_pretty(&config.masked()).context("Failed to render configuration")?;
    println!("{rendered}");

    match config.validate() {
        Ok(()) => {
            println!("Configuration is valid");
            Ok(())
        }
        Err(e) => {
            error!("Invalid configuration: {e:#}");
            Err(e)
        }
    }
}
