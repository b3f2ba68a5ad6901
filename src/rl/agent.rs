//! Heuristic baseline policy
//!
//! Heads for the nearest food while steering clear of walls and occupied
//! cells. On exploring episodes it takes a random action with probability
//! `epsilon`, and every training round anneals `epsilon` toward its floor.
//! It stands in for a learned policy so the arena can run end to end.

use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::observation::{create_observation, BODY, FOOD, OTHERS};
use super::persistence::{save_agent, AgentSnapshot};
use super::{Observation, PolicyAdapter};
use crate::game::{Direction, Position, ACTION_COUNT};
use crate::metrics::{EpisodeStats, StatsLog};

/// Exploration schedule of the heuristic agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Exploration rate before any training
    pub epsilon_start: f32,
    /// Exploration rate never drops below this
    pub epsilon_min: f32,
    /// Multiplier applied after every training round
    pub epsilon_decay: f32,
    /// Episodes kept for rolling statistics
    pub stats_window: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            stats_window: 100,
        }
    }
}

pub struct HeuristicAgent {
    config: AgentConfig,
    epsilon: f32,
    training_rounds: usize,
    samples_seen: usize,
    decisions: usize,
    stats: StatsLog,
    rng: SmallRng,
}

impl HeuristicAgent {
    pub fn new(config: AgentConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            epsilon: config.epsilon_start,
            stats: StatsLog::new(config.stats_window),
            config,
            training_rounds: 0,
            samples_seen: 0,
            decisions: 0,
            rng,
        }
    }

    /// Continue from a saved snapshot
    pub fn from_snapshot(snapshot: AgentSnapshot, seed: Option<u64>) -> Self {
        let mut agent = Self::new(snapshot.config, seed);
        agent.epsilon = snapshot.epsilon;
        agent.training_rounds = snapshot.training_rounds;
        agent.samples_seen = snapshot.samples_seen;
        agent
    }

    /// Parameters worth persisting
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::new(
            self.config.clone(),
            self.epsilon,
            self.training_rounds,
            self.samples_seen,
        )
    }

    /// Best non-random action: the safe move closest to food
    fn greedy_action(&self, observation: &Observation<'_>) -> usize {
        let grid = observation.grid;
        let width = grid.width();
        let plane = width * grid.height();
        let data = create_observation(observation);

        let food: Vec<Position> = (0..plane)
            .filter(|&idx| data[FOOD * plane + idx] > 0.0)
            .map(|idx| Position::new((idx % width) as i32, (idx / width) as i32))
            .collect();

        let mut best: Option<(i32, Direction)> = None;
        // current heading first so ties keep going straight
        let candidates = std::iter::once(observation.heading)
            .chain(Direction::ALL.into_iter().filter(|&d| d != observation.heading));

        for direction in candidates {
            let next = observation.head.moved_in_direction(direction);
            if !grid.contains(next) {
                continue;
            }
            let idx = (next.y as usize) * width + (next.x as usize);
            if data[OTHERS * plane + idx] > 0.0 || data[BODY * plane + idx] > 0.0 {
                continue;
            }

            let distance = food
                .iter()
                .map(|&item| next.manhattan_distance(item))
                .min()
                .unwrap_or(0);

            if best.map_or(true, |(score, _)| distance < score) {
                best = Some((distance, direction));
            }
        }

        best.map_or(observation.heading, |(_, direction)| direction)
            .index()
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn training_rounds(&self) -> usize {
        self.training_rounds
    }

    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    pub fn decisions(&self) -> usize {
        self.decisions
    }

    pub fn stats(&self) -> &StatsLog {
        &self.stats
    }
}

impl PolicyAdapter for HeuristicAgent {
    fn select_action(&mut self, observation: &Observation<'_>, exploring: bool) -> usize {
        self.decisions += 1;
        if exploring && self.rng.gen::<f32>() < self.epsilon {
            return self.rng.gen_range(0..ACTION_COUNT);
        }
        self.greedy_action(observation)
    }

    fn train_on_batch(&mut self, batch_size: usize) {
        self.training_rounds += 1;
        self.samples_seen += batch_size;
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);
    }

    fn record_stats(&mut self, stats: &EpisodeStats) {
        self.stats.record(stats.clone());
        tracing::info!(
            epsilon = self.epsilon,
            training_rounds = self.training_rounds,
            "{}",
            self.stats.format_summary()
        );
    }

    fn persist_parameters(&self, path: &Path) -> anyhow::Result<()> {
        save_agent(self, path)
    }
}
