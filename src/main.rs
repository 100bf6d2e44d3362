mod app;
mod config;
mod db;
mod pagination;
mod response;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "user_crud=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database_url, &config.pool).await?;
    db::ensure_schema(&pool).await?;
    tracing::info!(max_connections = config.pool.max_connections, "database ready");

    let app = app::build_app(AppState::from_pool(pool.clone()));
    let served = app::serve(app, &config.bind_addr()).await;

    pool.close().await;
    tracing::info!("database pool closed");
    served
}
