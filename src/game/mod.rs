//! Core arena logic
//!
//! This module contains the step simulation without any I/O or rendering
//! dependencies. The episode controller talks to the policy and the renderer
//! only through the traits in [`crate::rl`] and [`crate::render`].

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod grid;
pub mod state;
pub mod world;

// Re-export commonly used types
pub use action::{action_from_index, Action, Direction, ACTION_COUNT};
pub use collision::{DeathCause, Resolution};
pub use config::GameConfig;
pub use engine::{EpisodePhase, Simulation};
pub use error::SimError;
pub use food::FoodRegistry;
pub use grid::{Cell, Grid};
pub use state::{Position, Snake};
pub use world::{TickReport, World};
