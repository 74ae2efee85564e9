// All service modules
pub mod game_service;
pub mod shuffle;

// Re-export for convenience
pub use game_service::GameService;
pub use shuffle::SeededRandom;
