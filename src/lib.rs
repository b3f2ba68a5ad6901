//! Snake Arena - a multi-snake grid simulation used as a training environment
//!
//! This library provides:
//! - Deterministic step simulation, collisions and episode control (game module)
//! - The policy boundary and a heuristic baseline agent (rl module)
//! - Terminal rendering for evaluation episodes (render and input modules)
//! - Episode statistics (metrics module)
//! - Log routing away from the terminal view (logging module)
//! - The training driver used by the binary (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
