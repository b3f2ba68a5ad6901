use std::path::Path;

use super::action::{action_from_index, Action};
use super::config::GameConfig;
use super::error::SimError;
use super::world::{TickReport, World};
use crate::metrics::{EpisodeStats, RunMetrics};
use crate::render::{RenderFrame, Renderer};
use crate::rl::{Observation, PolicyAdapter};

/// Where the controller is within an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// At least one snake is alive
    Running,
    /// Every snake died; the next tick trains and resets
    AllDead,
}

/// The episode controller.
///
/// Owns the world for the lifetime of the process, asks the policy for one
/// action per live snake each tick, hands frames to the renderer on
/// evaluation episodes and resets the world once every snake is dead.
pub struct Simulation<P: PolicyAdapter, R: Renderer> {
    world: World,
    policy: P,
    renderer: R,
    phase: EpisodePhase,
    /// 1-based index of the current episode
    episode: usize,
    exploring: bool,
    rendering: bool,
    metrics: RunMetrics,
    last_report: Option<TickReport>,
}

impl<P: PolicyAdapter, R: Renderer> Simulation<P, R> {
    /// Validate the configuration and set up the first episode
    pub fn new(config: GameConfig, policy: P, renderer: R) -> Result<Self, SimError> {
        let world = World::setup(config)?;
        Ok(Self::with_world(world, policy, renderer))
    }

    /// Drive an already prepared world, e.g. one built with [`World::from_layout`]
    pub fn with_world(world: World, policy: P, renderer: R) -> Self {
        let mut sim = Self {
            world,
            policy,
            renderer,
            phase: EpisodePhase::Running,
            episode: 1,
            exploring: false,
            rendering: false,
            metrics: RunMetrics::new(),
            last_report: None,
        };
        sim.choose_mode();
        sim
    }

    /// Run one controller step.
    ///
    /// Returns `Ok(false)` once the renderer asks to stop. A tick that starts
    /// with every snake dead only trains the policy and resets the world.
    pub fn tick(&mut self) -> Result<bool, SimError> {
        if self.phase == EpisodePhase::AllDead {
            self.finish_episode()?;
            return Ok(!self.renderer.idle()?);
        }

        let exploring = self.exploring;
        let actions: Vec<Action> = self
            .world
            .snakes
            .iter()
            .map(|snake| {
                if snake.alive {
                    let observation = Observation::of(&self.world.grid, snake);
                    action_from_index(self.policy.select_action(&observation, exploring))
                } else {
                    Action::Continue
                }
            })
            .collect();

        let report = self.world.advance(&actions)?;
        self.last_report = Some(report);

        if self.world.all_dead() {
            self.phase = EpisodePhase::AllDead;
        }

        if self.rendering {
            let frame = RenderFrame {
                grid: &self.world.grid,
                ghost: &self.world.ghost,
                episode: self.episode,
                tick: self.world.tick,
                alive: self.world.alive_count(),
                players: self.world.snakes.len(),
                max_reward: self.world.max_reward,
                exploring: self.exploring,
            };
            if self.renderer.present(&frame)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Train on the finished episode, log it on the evaluation cadence, reset
    fn finish_episode(&mut self) -> Result<(), SimError> {
        let config = self.world.config();
        let batch_size = config.train_batch_size;
        let interval = config.evaluation_interval;

        self.policy.train_on_batch(batch_size);

        let stats = EpisodeStats {
            episode: self.episode,
            first_death_tick: self.world.first_death_tick(),
            // Ticks with a live snake; the training tick itself is not counted
            total_ticks: self.world.tick(),
            max_reward: self.world.max_reward(),
        };
        self.metrics.on_episode_end(&stats);

        if self.episode % interval == 0 {
            self.policy.record_stats(&stats);
            tracing::info!(
                episode = stats.episode,
                first_death_tick = stats.first_death_tick,
                total_ticks = stats.total_ticks,
                max_reward = stats.max_reward,
                best_reward = self.metrics.best_reward,
                "evaluation episode finished"
            );
        }

        self.world.reset()?;
        self.episode += 1;
        self.phase = EpisodePhase::Running;
        self.last_report = None;
        self.choose_mode();
        Ok(())
    }

    /// Evaluation episodes both render and explore
    fn choose_mode(&mut self) {
        let evaluation = self.episode % self.world.config().evaluation_interval == 0;
        self.rendering = evaluation;
        self.exploring = evaluation;
    }

    /// Persist the policy's learned parameters
    pub fn shutdown(&mut self, path: &Path) -> anyhow::Result<()> {
        self.policy.persist_parameters(path)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn episode(&self) -> usize {
        self.episode
    }

    pub fn is_exploring(&self) -> bool {
        self.exploring
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Report of the last simulated tick of the current episode
    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, FoodRegistry, Position, Snake};
    use crate::render::NullRenderer;

    /// Always picks the same action and records what the controller asks of it
    #[derive(Default)]
    struct FixedPolicy {
        action: usize,
        queries: usize,
        exploring_queries: usize,
        batches: Vec<usize>,
        stats: Vec<EpisodeStats>,
    }

    impl PolicyAdapter for FixedPolicy {
        fn select_action(&mut self, _observation: &Observation<'_>, exploring: bool) -> usize {
            self.queries += 1;
            if exploring {
                self.exploring_queries += 1;
            }
            self.action
        }

        fn train_on_batch(&mut self, batch_size: usize) {
            self.batches.push(batch_size);
        }

        fn record_stats(&mut self, stats: &EpisodeStats) {
            self.stats.push(stats.clone());
        }

        fn persist_parameters(&self, _path: &Path) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Stops after a fixed number of frames
    struct StopAfter {
        frames: usize,
        seen: usize,
    }

    impl Renderer for StopAfter {
        fn present(&mut self, _frame: &RenderFrame<'_>) -> Result<bool, SimError> {
            self.seen += 1;
            Ok(self.seen >= self.frames)
        }
    }

    fn config(players: usize) -> GameConfig {
        GameConfig {
            seed: Some(3),
            ..GameConfig::new(players, 12)
        }
    }

    fn run_until_phase(sim: &mut Simulation<FixedPolicy, NullRenderer>, phase: EpisodePhase) {
        for _ in 0..1_000 {
            if sim.phase() == phase {
                return;
            }
            assert!(sim.tick().unwrap());
        }
        panic!("phase {:?} never reached", phase);
    }

    #[test]
    fn test_policy_queried_once_per_live_snake() {
        let policy = FixedPolicy {
            action: 4,
            ..Default::default()
        };
        let mut sim = Simulation::new(config(3), policy, NullRenderer).unwrap();

        sim.tick().unwrap();
        assert_eq!(sim.policy().queries, 3);
        assert_eq!(sim.world().tick(), 1);
    }

    #[test]
    fn test_reset_follows_all_dead() {
        for players in 1..=4 {
            let mut sim = Simulation::new(config(players), FixedPolicy::default(), NullRenderer)
                .unwrap();

            run_until_phase(&mut sim, EpisodePhase::AllDead);
            assert!(sim.world().all_dead());
            assert!(sim.world().tick() > 0);
            assert_eq!(sim.episode(), 1);

            let queries = sim.policy().queries;
            assert!(sim.tick().unwrap());

            assert_eq!(sim.phase(), EpisodePhase::Running);
            assert_eq!(sim.episode(), 2);
            assert_eq!(sim.world().tick(), 0);
            assert_eq!(sim.world().first_death_tick(), 0);
            assert_eq!(sim.world().max_reward(), 0);
            assert_eq!(sim.world().alive_count(), players);
            assert_eq!(sim.world().food().len(), 3);
            assert_eq!(sim.policy().queries, queries);
            assert_eq!(sim.policy().batches, vec![100]);
            assert_eq!(sim.metrics().episodes, 1);
        }
    }

    #[test]
    fn test_stats_recorded_on_evaluation_cadence() {
        let config = GameConfig {
            evaluation_interval: 2,
            ..config(1)
        };
        let mut sim = Simulation::new(config, FixedPolicy::default(), NullRenderer).unwrap();
        assert!(!sim.is_exploring());

        run_until_phase(&mut sim, EpisodePhase::AllDead);
        sim.tick().unwrap();
        assert!(sim.policy().stats.is_empty());
        assert!(sim.is_exploring());
        assert!(sim.is_rendering());

        run_until_phase(&mut sim, EpisodePhase::AllDead);
        sim.tick().unwrap();

        let stats = &sim.policy().stats;
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].episode, 2);
        assert!(stats[0].total_ticks > 0);
        assert!(sim.policy().exploring_queries > 0);
        assert!(!sim.is_exploring());
    }

    #[test]
    fn test_renderer_stop_request_ends_run() {
        let config = GameConfig {
            evaluation_interval: 1,
            ..config(2)
        };
        let renderer = StopAfter { frames: 3, seen: 0 };
        let mut sim = Simulation::new(config, FixedPolicy::default(), renderer).unwrap();

        let mut ticks = 0;
        while sim.tick().unwrap() {
            ticks += 1;
            assert!(ticks < 1_000);
        }
        assert_eq!(sim.renderer_mut().seen, 3);
    }

    #[test]
    fn test_headless_episodes_never_render() {
        let renderer = StopAfter { frames: 1, seen: 0 };
        let mut sim = Simulation::new(config(2), FixedPolicy::default(), renderer).unwrap();

        for _ in 0..50 {
            assert!(sim.tick().unwrap());
        }
        assert_eq!(sim.renderer_mut().seen, 0);
    }

    #[test]
    fn test_with_world_drives_scripted_layout() {
        let snake = Snake::new(2, Position::new(4, 5), Direction::Right, 1, 100);
        let world = World::from_layout(
            GameConfig {
                food_amount: 1,
                seed: Some(1),
                ..GameConfig::new(1, 10)
            },
            vec![snake],
            FoodRegistry::from_items(vec![Position::new(5, 5)]),
        );
        let policy = FixedPolicy {
            action: 3,
            ..Default::default()
        };
        let mut sim = Simulation::with_world(world, policy, NullRenderer);

        sim.tick().unwrap();
        let report = sim.last_report().unwrap();
        assert_eq!(report.food_eaten(), 1);
        assert_eq!(sim.world().snakes()[0].reward, 1);
    }
}
