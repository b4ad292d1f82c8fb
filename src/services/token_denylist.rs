//! Revoked access tokens, keyed by `jti`, kept until the token would have
//! expired anyway.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;

#[derive(Clone)]
pub enum TokenDenylist {
    Redis(ConnectionManager),
    Memory(Arc<RwLock<HashMap<String, DateTime<Utc>>>>),
}

fn denylist_key(jti: &str) -> String {
    format!("token:denylist:{}", jti)
}

impl TokenDenylist {
    pub fn in_memory() -> Self {
        TokenDenylist::Memory(Arc::default())
    }

    pub async fn connect_redis(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url).context("Invalid Redis url")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;
        Ok(TokenDenylist::Redis(manager))
    }

    pub async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        let ttl = (expires_at - Utc::now()).num_seconds().max(1) as u64;

        match self {
            TokenDenylist::Redis(manager) => {
                let mut conn = manager.clone();
                conn.set_ex::<_, _, ()>(denylist_key(jti), "1", ttl)
                    .await
                    .context("Failed to add token to denylist in Redis")?;
            }
            TokenDenylist::Memory(entries) => {
                let now = Utc::now();
                let mut entries = entries.write().await;
                entries.retain(|_, expiry| *expiry > now);
                entries.insert(jti.to_string(), expires_at);
            }
        }

        tracing::info!(jti = %jti, ttl = ttl, "Token revoked");
        Ok(())
    }

    pub async fn is_revoked(&self, jti: &str) -> anyhow::Result<bool> {
        match self {
            TokenDenylist::Redis(manager) => {
                let mut conn = manager.clone();
                let exists: bool = conn
                    .exists(denylist_key(jti))
                    .await
                    .context("Failed to check token denylist in Redis")?;
                Ok(exists)
            }
            TokenDenylist::Memory(entries) => Ok(entries
                .read()
                .await
                .get(jti)
                .is_some_and(|expiry| *expiry > Utc::now())),
        }
    }
}
