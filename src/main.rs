//! Schoolsite server

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolsite::{
    api::{self, AppState},
    config::Config,
    db,
    services::create_mailer,
    theme::ThemeEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schoolsite=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting schoolsite...");

    // Load configuration
    let config_path = std::env::var("SCHOOLSITE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yml"));
    let config = Config::load_with_env(&config_path)?;
    config.validate().context("Invalid configuration")?;
    tracing::info!("Configuration loaded from {:?}", config_path);

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    let mailer = create_mailer(&config.mail)?;
    tracing::info!("Mail transport: {:?}", config.mail.transport);

    let theme = ThemeEngine::new(&config.theme.path)?;
    tracing::info!("Templates loaded");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, pool, mailer, theme);

    let purged = state.sessions.cleanup_expired().await?;
    if purged > 0 {
        tracing::info!("Removed {} expired sessions", purged);
    }

    let app = api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
