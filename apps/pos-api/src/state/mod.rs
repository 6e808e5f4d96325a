//! # Application State
//!
//! ```text
//! AppState (cloned into every handler)
//! ├── store:  PosStore   ← Arc<Mutex<PosState>> + snapshot persistence
//! └── config: Arc<PosConfig>
//! ```

mod config;
mod store;

use std::sync::Arc;

pub use config::{ConfigError, PosConfig, DEFAULT_BIND_ADDR};
pub use store::PosStore;

/// State shared by all routes.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: PosStore,
    pub config: Arc<PosConfig>,
}

impl AppState {
    pub fn new(store: PosStore, config: PosConfig) -> Self {
        AppState {
            store,
            config: Arc::new(config),
        }
    }
}
