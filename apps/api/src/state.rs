use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::create_pool;
use crate::store::memory::{InMemoryCollegeStore, InMemoryUserStore};
use crate::store::postgres::{PgCollegeStore, PgUserStore};
use crate::store::{CollegeStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// College reference data. Read-only after startup seeding.
    pub colleges: Arc<dyn CollegeStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Picks the storage backend from config: Postgres when `DATABASE_URL` is set.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.database_url.as_deref() {
            Some(url) => {
                let pool = create_pool(url, config.database_max_connections).await?;
                Ok(AppState {
                    colleges: Arc::new(PgCollegeStore::new(pool.clone())),
                    users: Arc::new(PgUserStore::new(pool)),
                })
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory storage (data is lost on restart)");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        info!("In-memory stores initialized");
        AppState {
            colleges: Arc::new(InMemoryCollegeStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
        }
    }
}
