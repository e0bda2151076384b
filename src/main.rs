use std::sync::Arc;

mod accounts;
mod app;
mod config;
mod db;
mod error;
mod state;

use crate::accounts::repo::{AccountStore, PgAccountStore};
use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "registrar=debug,axum=info,tower_http=info".to_string());
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
    tracing::info!(
        host = %config.db.host,
        port = config.db.port,
        user = %config.db.user,
        database = %config.db.name,
        "account store configured"
    );

    let store = Arc::new(PgAccountStore::new(db::connect_lazy(&config.db)));

    // Requests are served while this runs; inserts retry the DDL until it succeeds once.
    let init_store = store.clone();
    tokio::spawn(async move {
        if let Err(e) = init_store.ensure_schema().await {
            tracing::error!(error = %e, "initial accounts table setup failed");
        }
    });

    let app = app::build_app(AppState::with_store(store));
    app::serve(app, config.listen_addr()?).await
}
