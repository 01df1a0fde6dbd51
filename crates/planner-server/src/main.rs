use std::sync::Arc;

use anyhow::Context;
use planner_core::db;
use planner_core::repository::SqliteRepository;
use planner_server::api::{self, AppState};
use planner_server::config::Config;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("failed to load configuration")?;

    let pool = db::establish_connection(&config.database_path)
        .await
        .with_context(|| format!("failed to open task database {:?}", config.database_path))?;
    let repository = Arc::new(SqliteRepository::new(pool));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, auth = !config.password.is_empty(), "planner server listening");

    let state = AppState {
        repository,
        config: Arc::new(config),
    };
    axum::serve(listener, api::router(state))
        .await
        .context("server error")?;

    Ok(())
}
