// src/models/mod.rs
pub mod action;
pub mod game;

pub use action::{Action, ActionRequest};
pub use game::{GameState, QuarterScore};
