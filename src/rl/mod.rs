//! Boundary between the arena and the policy that drives it
//!
//! Provides:
//! - The [`PolicyAdapter`] trait the episode controller talks to
//! - A borrowed per-snake [`Observation`] and its 4-channel encoding
//! - A heuristic baseline agent and JSON persistence for it

pub mod agent;
pub mod observation;
pub mod persistence;

use std::path::Path;

use crate::game::{Direction, Grid, Position, Snake};
use crate::metrics::EpisodeStats;

pub use agent::{AgentConfig, HeuristicAgent};
pub use observation::{create_observation, CHANNELS};
pub use persistence::{load_agent, save_agent, AgentSnapshot};

/// What one snake sees when asked for an action
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Grid as drawn at the end of the previous tick
    pub grid: &'a Grid,
    /// Color of the snake being asked
    pub color: u8,
    pub head: Position,
    pub heading: Direction,
    pub life: i32,
}

impl<'a> Observation<'a> {
    pub fn of(grid: &'a Grid, snake: &Snake) -> Self {
        Self {
            grid,
            color: snake.color,
            head: snake.head(),
            heading: snake.heading,
            life: snake.life,
        }
    }
}

/// A decision-making policy trained against the arena.
///
/// The arena never looks inside the policy: it sends observations and
/// receives action indices (see [`crate::game::action_from_index`]), signals
/// when an episode's experience can be trained on, and forwards episode
/// statistics on the evaluation cadence.
pub trait PolicyAdapter {
    /// Choose an action index for one live snake
    fn select_action(&mut self, observation: &Observation<'_>, exploring: bool) -> usize;

    /// Train on up to `batch_size` samples; called once per finished episode
    fn train_on_batch(&mut self, batch_size: usize);

    /// Record the statistics of an evaluation episode
    fn record_stats(&mut self, stats: &EpisodeStats);

    /// Write learned parameters to durable storage
    fn persist_parameters(&self, path: &Path) -> anyhow::Result<()>;
}
