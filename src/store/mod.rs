// src/store/mod.rs
pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::{error::Result, models::GameState};

/// Key-value persistence for the single game document.
#[async_trait::async_trait]
pub trait GameStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<GameState>>;

    async fn set(&self, key: &str, state: &GameState) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}
