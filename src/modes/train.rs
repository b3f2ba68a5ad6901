//! Training driver
//!
//! Calls [`Simulation::tick`] until the renderer asks to stop, an external
//! stop flag is raised or the episode limit is reached, saving checkpoints
//! along the way and persisting the policy on the way out.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use std::sync::atomic::AtomicBool;
//! use snake_arena::game::{GameConfig, Simulation};
//! use snake_arena::modes::{TrainConfig, TrainMode};
//! use snake_arena::render::NullRenderer;
//! use snake_arena::rl::{AgentConfig, HeuristicAgent};
//!
//! let agent = HeuristicAgent::new(AgentConfig::default(), None);
//! let sim = Simulation::new(GameConfig::default(), agent, NullRenderer)?;
//! let mut mode = TrainMode::new(sim, TrainConfig::new(PathBuf::from("data/agent.json")));
//! mode.run(&AtomicBool::new(false))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

use crate::game::{EpisodePhase, Simulation};
use crate::render::Renderer;
use crate::rl::PolicyAdapter;

/// Configuration for the training driver
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Where the policy is persisted on exit
    pub save_path: PathBuf,

    /// Stop after this many finished episodes
    pub max_episodes: Option<usize>,

    /// Save a checkpoint every N finished episodes (0 disables)
    pub checkpoint_frequency: usize,
}

impl TrainConfig {
    pub fn new(save_path: PathBuf) -> Self {
        Self {
            save_path,
            max_episodes: None,
            checkpoint_frequency: 1000,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The renderer reported a stop request
    UserRequested,
    /// The external stop flag was raised
    Interrupted,
    /// `max_episodes` episodes finished
    EpisodeLimit,
}

pub struct TrainMode<P: PolicyAdapter, R: Renderer> {
    sim: Simulation<P, R>,
    config: TrainConfig,
}

impl<P: PolicyAdapter, R: Renderer> TrainMode<P, R> {
    pub fn new(sim: Simulation<P, R>, config: TrainConfig) -> Self {
        Self { sim, config }
    }

    /// Run until something asks to stop, then persist the policy
    pub fn run(&mut self, stop: &AtomicBool) -> Result<StopReason> {
        tracing::info!(
            players = self.sim.world().config().player_count,
            width = self.sim.world().config().grid_width,
            height = self.sim.world().config().grid_height,
            save_path = %self.config.save_path.display(),
            "training started"
        );

        let result = self.run_loop(stop);

        // Release the terminal before anything else gets printed
        self.sim
            .renderer_mut()
            .finish()
            .context("Failed to restore renderer")?;

        // Persist even when the loop failed, then report the loop's error first
        let persisted = self
            .sim
            .shutdown(&self.config.save_path)
            .with_context(|| format!("Failed to persist policy to {:?}", self.config.save_path));

        let reason = result?;
        persisted?;

        let metrics = self.sim.metrics();
        tracing::info!(
            reason = ?reason,
            episodes = metrics.episodes,
            best_reward = metrics.best_reward,
            ticks_per_second = metrics.ticks_per_second(),
            elapsed = %metrics.format_time(),
            "training stopped"
        );

        Ok(reason)
    }

    fn run_loop(&mut self, stop: &AtomicBool) -> Result<StopReason> {
        loop {
            if stop.load(Ordering::Relaxed) {
                return Ok(StopReason::Interrupted);
            }

            let finishing = self.sim.phase() == EpisodePhase::AllDead;
            let keep_going = self.sim.tick().context("Simulation tick failed")?;

            if finishing {
                let finished = self.sim.metrics().episodes;
                if self.config.checkpoint_frequency > 0
                    && finished % self.config.checkpoint_frequency == 0
                {
                    self.save_checkpoint(finished)?;
                }
                if self.config.max_episodes.is_some_and(|max| finished >= max) {
                    return Ok(StopReason::EpisodeLimit);
                }
            }

            if !keep_going {
                return Ok(StopReason::UserRequested);
            }
        }
    }

    fn save_checkpoint(&mut self, finished: usize) -> Result<()> {
        let path = checkpoint_path(&self.config.save_path, finished);
        self.sim
            .shutdown(&path)
            .with_context(|| format!("Failed to save checkpoint to {:?}", path))?;
        tracing::info!(path = %path.display(), "checkpoint saved");
        Ok(())
    }

    pub fn simulation(&self) -> &Simulation<P, R> {
        &self.sim
    }
}

/// `data/agent.json` + 400 → `data/checkpoint_ep400.json`
fn checkpoint_path(save_path: &Path, episode: usize) -> PathBuf {
    let extension = save_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("json");
    save_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("checkpoint_ep{}.{}", episode, extension))
}
