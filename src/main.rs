use anyhow::Context;
use billing_engine::config::{Config, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("billing_engine={},sqlx=warn", config.app.log_level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting billing engine");
    tracing::info!("Environment: {}", config.app.env);

    // Open the pool and apply pending migrations
    let db_pool = config
        .database
        .connect()
        .await
        .context("Failed to prepare database")?;

    tracing::info!(
        max_connections = config.database.max_connections,
        "Database schema is up to date"
    );

    db_pool.close().await;

    Ok(())
}
