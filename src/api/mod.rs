// src/api/mod.rs

pub mod game;
pub mod health;

use crate::config::Config;
use crate::services::GameService;

#[derive(Clone)]
pub struct AppState {
    pub game: GameService,
    pub config: Config,
}
