use redis::{aio::ConnectionManager, AsyncCommands};

use super::GameStore;
use crate::{error::Result, models::GameState};

/// Stores the game document as JSON text under a plain Redis string key.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl GameStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<GameState>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(payload) => {
                let state: GameState = serde_json::from_str(&payload)?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, state: &GameState) -> Result<()> {
        let payload = serde_json::to_string(state)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, payload).await?;
        tracing::debug!("Persisted game document key={}", key);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
