//! Per-snake collision resolution.
//!
//! Snakes are resolved one at a time in registration order, after every snake
//! has already moved. A snake killed earlier in the pass is no longer an
//! obstacle for the ones resolved after it, so when two heads meet only the
//! first one registered dies. Food respawns sample the grid drawn on the
//! previous tick, not a simultaneous view of this one.

use super::error::SimError;
use super::world::World;

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Head left the grid
    Wall,
    /// Life budget ran out
    Starvation,
    /// Head landed on another snake's head
    HeadToHead,
    /// Head landed on another snake's body
    Body,
    /// Head landed on its own body
    SelfCollision,
}

/// Outcome of resolving one snake for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Food items eaten this tick
    pub eaten: u32,
    pub death: Option<DeathCause>,
}

/// Resolve bounds, starvation, food and contact for the snake at `idx`.
///
/// Dead snakes are skipped entirely.
pub fn resolve(world: &mut World, idx: usize) -> Result<Resolution, SimError> {
    let mut resolution = Resolution::default();

    let (head, life) = {
        let snake = &world.snakes[idx];
        if !snake.alive {
            return Ok(resolution);
        }
        (snake.head(), snake.life)
    };

    if !world.grid.contains(head) {
        resolution.death = Some(kill(world, idx, DeathCause::Wall));
        return Ok(resolution);
    }

    if life <= 0 {
        resolution.death = Some(kill(world, idx, DeathCause::Starvation));
        return Ok(resolution);
    }

    let newest_first: Vec<_> = world.food.items().iter().rev().copied().collect();
    for item in newest_first {
        if item != head {
            continue;
        }

        let World {
            grid,
            food,
            snakes,
            rng,
            ..
        } = &mut *world;
        food.respawn_one(item, grid, rng, |pos| {
            snakes.iter().any(|s| s.alive && s.occupies(pos))
        })?;

        let initial_life = world.config.initial_life;
        let snake = &mut world.snakes[idx];
        snake.life = initial_life;
        snake.reward += 1;
        snake.add_segment();
        resolution.eaten += 1;
    }

    let color = world.snakes[idx].color;
    let contact = world
        .snakes
        .iter()
        .filter(|other| other.alive && other.color != color)
        .find_map(|other| {
            if other.head() == head {
                Some(DeathCause::HeadToHead)
            } else if other.occupies(head) {
                Some(DeathCause::Body)
            } else {
                None
            }
        });

    if let Some(cause) = contact {
        resolution.death = Some(kill(world, idx, cause));
        return Ok(resolution);
    }

    if world.config.self_collision && world.snakes[idx].collides_with_body(head) {
        resolution.death = Some(kill(world, idx, DeathCause::SelfCollision));
    }

    Ok(resolution)
}

fn kill(world: &mut World, idx: usize, cause: DeathCause) -> DeathCause {
    let snake = &mut world.snakes[idx];
    snake.alive = false;
    tracing::debug!(
        color = snake.color,
        tick = world.tick,
        cause = ?cause,
        length = snake.len(),
        "snake died"
    );
    // Recorded on the tick the snake dies, for every cause. Counting
    // non-wall deaths from the following step instead would shift them by one.
    if world.first_death_tick == 0 {
        world.first_death_tick = world.tick;
    }
    cause
}
