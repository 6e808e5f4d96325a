//! # Caixa POS API
//!
//! Entry point for the local POS backend.
//!
//! ## Environment
//! - `CAIXA_DB_PATH` - SQLite file (default: platform data dir)
//! - `CAIXA_BIND_ADDR` - listen address (default: 127.0.0.1:4000)
//! - `CAIXA_STORE_NAME` - shown on receipts
//! - `CAIXA_STORAGE_KEY` - snapshot key (default: caixa-pos-storage)
//! - `CAIXA_UTC_OFFSET_MINUTES` - receipt clock offset (default: -180)

use caixa_pos_api::state::PosConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    caixa_pos_api::init_tracing();

    info!("Starting Caixa POS API...");

    let config = PosConfig::from_env()?;
    info!(
        bind = %config.bind_addr,
        store = config.store_name.as_deref().unwrap_or("-"),
        "Configuration loaded"
    );

    caixa_pos_api::run(config).await
}
