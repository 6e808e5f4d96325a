//! # Caixa Admin API
//!
//! Tenant provisioning server.

use caixa_admin_api::config::AdminConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    caixa_admin_api::init_tracing();

    info!("Starting Caixa Admin API...");

    let config = AdminConfig::load()?;
    info!(
        port = config.http_port,
        backend = ?config.backend,
        default_days = config.default_days_given,
        "Configuration loaded"
    );

    caixa_admin_api::run(config).await
}
