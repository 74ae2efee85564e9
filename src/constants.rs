/// Application constants

// Board geometry
pub const GRID_SIZE: usize = 10;
pub const SQUARE_COUNT: usize = GRID_SIZE * GRID_SIZE;
pub const QUARTER_COUNT: usize = 4;

// Claimant initials
pub const INITIALS_MIN_LEN: usize = 2;
pub const INITIALS_MAX_LEN: usize = 4;

// Document defaults
pub const DEFAULT_TEAM1_NAME: &str = "Patriots";
pub const DEFAULT_TEAM2_NAME: &str = "Seahawks";
pub const DEFAULT_PRICE_PER_SQUARE: f64 = 2.0;

// Store
pub const DEFAULT_GAME_STATE_KEY: &str = "superbowl-squares-game";
pub const STORE_BACKEND_REDIS: &str = "redis";
pub const STORE_BACKEND_MEMORY: &str = "memory";

// API version
pub const API_VERSION: &str = "v1";
