use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::services::TokenDenylist;
use crate::store::{DocumentStore, MemoryStore, PgStore};

#[derive(Clone)]
pub struct Database {
    pub store: Arc<dyn DocumentStore>,
    pub denylist: TokenDenylist,
}

impl Database {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Postgres => {
                let pg = PgStore::connect(&config.store.url, config.store.max_connections).await?;
                pg.run_migrations().await?;
                Arc::new(pg)
            }
        };

        let denylist = match &config.redis.url {
            Some(url) => {
                let denylist = TokenDenylist::connect_redis(url).await?;
                tracing::info!("Redis token denylist connected");
                denylist
            }
            None => TokenDenylist::in_memory(),
        };

        Ok(Self { store, denylist })
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            denylist: TokenDenylist::in_memory(),
        }
    }

    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }
}
