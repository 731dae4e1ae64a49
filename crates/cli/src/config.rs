//! Server settings, from flags with environment fallbacks.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use api::AppState;
use db::{MemoryStore, PgStore, Seed};

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Address the API listens on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Postgres URL.  Without one the server keeps everything in memory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// JSON seed for the in-memory store (definitions, templates,
    /// automations).  Defaults to the demo catalog.
    #[arg(long, env = "SEED_FILE")]
    pub seed: Option<PathBuf>,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,
}

impl Settings {
    pub fn load_seed(&self) -> anyhow::Result<Seed> {
        match &self.seed {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read seed file {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("invalid seed file {}", path.display()))
            }
            None => Ok(builder::catalog::demo_seed()?),
        }
    }

    /// Connect the configured backend.
    pub async fn app_state(&self) -> anyhow::Result<AppState> {
        match &self.database_url {
            Some(url) => {
                let store = Arc::new(
                    PgStore::connect(url, self.max_connections)
                        .await
                        .context("failed to connect to database")?,
                );
                info!("using Postgres store");
                Ok(AppState::new(store.clone(), store))
            }
            None => {
                let store = Arc::new(MemoryStore::with_seed(self.load_seed()?));
                info!("using in-memory store");
                Ok(AppState::new(store.clone(), store))
            }
        }
    }
}
