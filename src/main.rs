use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fin_api::app::{app, AppState};
use fin_api::config::AppConfig;
use fin_api::database::DatabaseManager;

#[derive(Parser, Debug)]
#[command(name = "fin-api")]
#[command(about = "Personal finance API server")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 2021)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    host: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and JWT_SECRET are picked up
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.api.log_filter)),
        )
        .init();

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    tracing::info!("Starting Fin API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect_from_env(&config.database)
        .await
        .context("failed to connect to database")?;

    let state = AppState::from_pool(&config, pool);

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Fin API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
