use std::collections::HashSet;
use std::f64::consts::PI;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::SimError;
use super::state::Position;

/// Configuration for an arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Number of snakes placed each episode
    pub player_count: usize,
    /// Food items kept on the grid at all times
    pub food_amount: usize,
    /// Life budget at spawn and after every meal
    pub initial_life: i32,
    /// Initial length of every snake
    pub initial_snake_length: usize,
    /// Every Nth episode is rendered and explores
    pub evaluation_interval: usize,
    /// Batch size handed to the policy when an episode ends
    pub train_batch_size: usize,
    /// Kill a snake whose head lands on its own body
    pub self_collision: bool,
    /// Seed for the arena RNG; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            player_count: 4,
            food_amount: 3,
            initial_life: 100,
            initial_snake_length: 1,
            evaluation_interval: 200,
            train_batch_size: 100,
            self_collision: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration for a square grid
    pub fn new(player_count: usize, grid_size: usize) -> Self {
        Self {
            grid_width: grid_size,
            grid_height: grid_size,
            player_count,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(2, 10)
    }

    /// Read a configuration from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse config JSON")?;
        Ok(config)
    }

    /// Start position and heading of every player.
    ///
    /// Players sit evenly on a circle of radius `0.3 * width` around the grid
    /// centre, each heading toward the centre along its dominant axis.
    pub fn spawn_layout(&self) -> Vec<(Position, Direction)> {
        let radius = (self.grid_width as f64 * 0.3).floor();
        let center_x = (self.grid_width / 2) as f64;
        let center_y = (self.grid_height / 2) as f64;

        (0..self.player_count)
            .map(|i| {
                let angle = i as f64 * 2.0 * (PI / self.player_count as f64);
                let x = (center_x + angle.cos() * radius).floor() as i32;
                let y = (center_y + angle.sin() * radius).floor() as i32;
                let to_center_x = center_x as i32 - x;
                let to_center_y = center_y as i32 - y;

                let heading = if to_center_x == 0 && to_center_y == 0 {
                    Direction::Right
                } else if to_center_x.abs() >= to_center_y.abs() {
                    if to_center_x > 0 {
                        Direction::Right
                    } else {
                        Direction::Left
                    }
                } else if to_center_y > 0 {
                    Direction::Down
                } else {
                    Direction::Up
                };

                (Position::new(x, y), heading)
            })
            .collect()
    }

    /// Check that an episode can be set up with this configuration
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: &str| Err(SimError::InvalidConfig(msg.to_string()));

        if self.grid_width == 0 || self.grid_height == 0 {
            return invalid("grid dimensions must be positive");
        }
        if self.player_count == 0 {
            return invalid("player_count must be at least 1");
        }
        if self.player_count > 127 {
            return invalid("player_count must be at most 127");
        }
        if self.food_amount == 0 {
            return invalid("food_amount must be at least 1");
        }
        if self.initial_life <= 0 {
            return invalid("initial_life must be positive");
        }
        if self.initial_snake_length == 0 {
            return invalid("initial_snake_length must be at least 1");
        }
        if self.evaluation_interval == 0 {
            return invalid("evaluation_interval must be at least 1");
        }

        let mut occupied = HashSet::new();
        for (head, heading) in self.spawn_layout() {
            if !occupied.insert(head) {
                return Err(SimError::InvalidConfig(format!(
                    "{} players do not fit on a {}x{} grid without sharing a start cell",
                    self.player_count, self.grid_width, self.grid_height
                )));
            }
            let (dx, dy) = heading.delta();
            for i in 1..self.initial_snake_length as i32 {
                let segment = head.moved_by(-dx * i, -dy * i);
                if !self.in_bounds(segment) {
                    return invalid("initial snake segments leave the grid");
                }
                if !occupied.insert(segment) {
                    return invalid("initial snakes overlap");
                }
            }
            if !self.in_bounds(head) {
                return invalid("start position lies outside the grid");
            }
        }

        let free_cells = self.grid_width * self.grid_height - occupied.len();
        if free_cells < self.food_amount {
            return Err(SimError::InvalidConfig(format!(
                "{} food items need free cells but only {} remain",
                self.food_amount, free_cells
            )));
        }

        Ok(())
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.player_count, 4);
        assert_eq!(config.initial_life, 100);
        assert_eq!(config.evaluation_interval, 200);
        assert_eq!(config.train_batch_size, 100);
        assert!(!config.self_collision);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(3, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.player_count, 3);
    }

    #[test]
    fn test_spawn_layout_on_circle() {
        let config = GameConfig::new(4, 20);
        let layout = config.spawn_layout();

        // radius 6 around (10, 10)
        assert_eq!(layout[0], (Position::new(16, 10), Direction::Left));
        assert_eq!(layout[1], (Position::new(10, 16), Direction::Up));
        assert_eq!(layout[2], (Position::new(4, 10), Direction::Right));
        assert_eq!(layout[3].0.y, 4);
        assert_eq!(layout[3].1, Direction::Down);
    }

    #[test]
    fn test_rejects_crowded_grid() {
        let config = GameConfig::new(8, 2);
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_too_much_food() {
        let config = GameConfig {
            food_amount: 9,
            ..GameConfig::new(1, 3)
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            food_amount: 8,
            ..GameConfig::new(1, 3)
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(GameConfig::new(0, 10).validate().is_err());
        assert!(GameConfig::new(1, 0).validate().is_err());
        let config = GameConfig {
            evaluation_interval: 0,
            ..GameConfig::small()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("arena.json");
        std::fs::write(&path, r#"{ "player_count": 2, "seed": 7 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.player_count, 2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.grid_width, 20);
    }
}
