//! Sealbid HTTP service.
//!
//! Configuration comes from the environment:
//! - `SEALBID_ADDR`       listen address (default `0.0.0.0:3000`)
//! - `SEALBID_DB`         SQLite path (default `sealbid_otc.db`)
//! - `SEALBID_ORACLE_URL` time-lock oracle base URL (default NanoShutter staging)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sealbid_engine::OtcEngine;
use sealbid_oracle::{NanoShutterOracle, TimelockOracle};
use sealbid_store::TradeStore;
use sealbid_types::{EngineConfig, constants};

mod error;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sealbid=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_path = env::var("SEALBID_DB").unwrap_or_else(|_| constants::DEFAULT_DB_PATH.into());
    let oracle_url =
        env::var("SEALBID_ORACLE_URL").unwrap_or_else(|_| constants::DEFAULT_ORACLE_URL.into());
    let addr: SocketAddr = env::var("SEALBID_ADDR")
        .unwrap_or_else(|_| constants::DEFAULT_API_ADDR.into())
        .parse()?;

    let store = TradeStore::connect(&db_path).await?;
    store.init().await?;
    tracing::info!(db = %db_path, "storage ready");

    let oracle: Arc<dyn TimelockOracle> = Arc::new(NanoShutterOracle::new(oracle_url));
    let engine = Arc::new(OtcEngine::new(store, oracle, &EngineConfig::default()));

    let app = routes::router(engine);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        "{} v{} listening",
        constants::ENGINE_NAME,
        constants::VERSION
    );
    axum::serve(listener, app).await?;
    Ok(())
}
