//! claims_server: standalone REST gateway for claims intake.
//!
//! See `claims_server::config` for the environment variables it reads.

use std::sync::Arc;

use anyhow::Context;
use claims_core::ports::{ClaimStore, ConfigStore};
use claims_core::service::{ClaimsService, ClaimsServiceImpl};
use claims_core::stores::{FileConfigStore, MemoryClaimStore, MemoryConfigStore};
use claims_postgres::PgStores;
use claims_server::config::{ServerConfig, StoreBackend};
use claims_server::router::build_router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,claims_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let (claims, configs): (Arc<dyn ClaimStore>, Arc<dyn ConfigStore>) = match config.store {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("CLAIMS_DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(url)
                .await
                .context("failed to connect to database")?;
            claims_postgres::ensure_schema(&pool).await?;
            tracing::info!("Connected to database");
            let stores = PgStores::new(pool);
            (stores.claims, stores.configs)
        }
        StoreBackend::File => {
            tracing::warn!("claims are kept in memory; only the config document is persisted");
            let configs: Arc<dyn ConfigStore> = Arc::new(FileConfigStore::new(&config.config_path));
            (Arc::new(MemoryClaimStore::new()) as Arc<dyn ClaimStore>, configs)
        }
        StoreBackend::Memory => {
            tracing::warn!("in-memory store: all data is lost on restart");
            let configs: Arc<dyn ConfigStore> = Arc::new(MemoryConfigStore::new());
            (Arc::new(MemoryClaimStore::new()) as Arc<dyn ClaimStore>, configs)
        }
    };
    tracing::info!(store = ?config.store, "stores ready");

    let service: Arc<dyn ClaimsService> = Arc::new(ClaimsServiceImpl::new(claims, configs));
    let app = build_router(service, config.cors_origin.as_deref());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("claims_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
