use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::action::Action;
use super::collision::{self, Resolution};
use super::config::GameConfig;
use super::error::SimError;
use super::food::FoodRegistry;
use super::grid::{Cell, Grid};
use super::state::Snake;

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick number after advancing
    pub tick: u32,
    /// One entry per snake, in registration order
    pub outcomes: Vec<Resolution>,
}

impl TickReport {
    /// Food eaten by all snakes this tick
    pub fn food_eaten(&self) -> u32 {
        self.outcomes.iter().map(|outcome| outcome.eaten).sum()
    }

    /// Snakes that died this tick
    pub fn deaths(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.death.is_some())
            .count()
    }
}

/// All mutable state of one episode.
///
/// The grid and ghost grid are redrawn from the food registry and the live
/// snakes at the end of every tick, never patched incrementally.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) config: GameConfig,
    pub(crate) grid: Grid,
    pub(crate) ghost: Grid,
    pub(crate) food: FoodRegistry,
    pub(crate) snakes: Vec<Snake>,
    pub(crate) tick: u32,
    pub(crate) first_death_tick: u32,
    pub(crate) max_reward: u32,
    pub(crate) rng: SmallRng,
}

impl World {
    /// Validate the configuration and set up the first episode
    pub fn setup(config: GameConfig) -> Result<Self, SimError> {
        config.validate()?;

        let rng = seeded_rng(config.seed);
        let mut world = Self {
            grid: Grid::new(config.grid_width, config.grid_height),
            ghost: Grid::new(config.grid_width, config.grid_height),
            food: FoodRegistry::new(),
            snakes: Vec::with_capacity(config.player_count),
            tick: 0,
            first_death_tick: 0,
            max_reward: 0,
            rng,
            config,
        };
        world.reset()?;
        Ok(world)
    }

    /// Build a world from explicit snakes and food, skipping placement.
    ///
    /// Useful for scripted scenarios; the grid is drawn immediately.
    pub fn from_layout(config: GameConfig, snakes: Vec<Snake>, food: FoodRegistry) -> Self {
        let rng = seeded_rng(config.seed);
        let mut world = Self {
            grid: Grid::new(config.grid_width, config.grid_height),
            ghost: Grid::new(config.grid_width, config.grid_height),
            food,
            snakes,
            tick: 0,
            first_death_tick: 0,
            max_reward: 0,
            rng,
            config,
        };
        world.redraw();
        world
    }

    /// Discard every snake and all food, then place a fresh episode
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.grid.clear();
        self.ghost.clear();
        self.snakes.clear();
        self.tick = 0;
        self.first_death_tick = 0;
        self.max_reward = 0;

        for (i, (head, heading)) in self.config.spawn_layout().into_iter().enumerate() {
            let color = (2 * (i + 1)) as u8;
            let snake = Snake::new(
                color,
                head,
                heading,
                self.config.initial_snake_length,
                self.config.initial_life,
            );
            snake.draw(&mut self.grid, &mut self.ghost);
            self.snakes.push(snake);
        }

        self.food
            .seed(self.config.food_amount, &mut self.grid, &mut self.rng)
    }

    /// Advance one tick with one action per snake.
    ///
    /// Every live snake moves and spends one unit of life first, then each is
    /// resolved in registration order, then the grids are redrawn. Actions for
    /// dead snakes are ignored.
    pub fn advance(&mut self, actions: &[Action]) -> Result<TickReport, SimError> {
        debug_assert_eq!(actions.len(), self.snakes.len());

        self.tick += 1;

        for (snake, &action) in self.snakes.iter_mut().zip(actions) {
            if snake.alive {
                snake.propose_move(action);
                snake.decrement_life();
            }
        }

        let mut outcomes = Vec::with_capacity(self.snakes.len());
        for idx in 0..self.snakes.len() {
            outcomes.push(collision::resolve(self, idx)?);
        }

        self.redraw();

        if let Some(best) = self.snakes.iter().map(|snake| snake.reward).max() {
            self.max_reward = self.max_reward.max(best);
        }

        Ok(TickReport {
            tick: self.tick,
            outcomes,
        })
    }

    /// Rebuild both grids from the food registry and the live snakes.
    ///
    /// The ghost grid keeps the snake cells of the outgoing grid so the
    /// previous tick's positions show up as a trail.
    fn redraw(&mut self) {
        self.ghost.clear();
        for (pos, cell) in self.grid.iter() {
            if matches!(cell, Cell::Snake(_)) {
                self.ghost.paint(pos, cell);
            }
        }

        self.grid.clear();
        self.food.draw(&mut self.grid);
        for snake in &self.snakes {
            snake.draw(&mut self.grid, &mut self.ghost);
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ghost(&self) -> &Grid {
        &self.ghost
    }

    pub fn food(&self) -> &FoodRegistry {
        &self.food
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Tick of the first death this episode, 0 while everyone lives
    pub fn first_death_tick(&self) -> u32 {
        self.first_death_tick
    }

    pub fn max_reward(&self) -> u32 {
        self.max_reward
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|snake| snake.alive).count()
    }

    pub fn all_dead(&self) -> bool {
        self.snakes.iter().all(|snake| !snake.alive)
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}
