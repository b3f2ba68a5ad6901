use super::action::{Action, Direction};
use super::grid::{Cell, Grid};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// A snake on the shared grid
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Unique discriminator, also the tag painted into the grid
    pub color: u8,
    /// Body segments, with head at index 0
    pub segments: Vec<Position>,
    /// Current direction of travel
    pub heading: Direction,
    /// Ticks left before starving
    pub life: i32,
    /// Food eaten this episode
    pub reward: u32,
    pub alive: bool,
    /// Moves that will keep their tail instead of dropping it
    pending_growth: usize,
}

impl Snake {
    /// Create a new snake with extra segments trailing behind the head
    pub fn new(color: u8, head: Position, heading: Direction, length: usize, life: i32) -> Self {
        let mut segments = vec![head];

        let (dx, dy) = heading.delta();
        for i in 1..length {
            let prev = segments[i - 1];
            segments.push(prev.moved_by(-dx, -dy));
        }

        Self {
            color,
            segments,
            heading,
            life,
            reward: 0,
            alive: true,
            pending_growth: 0,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.segments[1..]
    }

    /// Check if a position collides with any segment, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Apply an action and advance the head one cell.
    ///
    /// Turning is unrestricted, a reversal moves the head back onto the neck.
    /// The tail is dropped unless growth was requested by an earlier
    /// [`Snake::add_segment`]. Dead snakes do not move.
    pub fn propose_move(&mut self, action: Action) {
        if !self.alive {
            return;
        }

        if let Action::Move(direction) = action {
            self.heading = direction;
        }

        let new_head = self.head().moved_in_direction(self.heading);
        self.segments.insert(0, new_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.segments.pop();
        }
    }

    /// Grow by one segment on the next move
    pub fn add_segment(&mut self) {
        if self.alive {
            self.pending_growth += 1;
        }
    }

    /// Spend one tick of life
    pub fn decrement_life(&mut self) {
        if self.alive {
            self.life -= 1;
        }
    }

    /// Paint every segment into the grid and the ghost grid
    pub fn draw(&self, grid: &mut Grid, ghost: &mut Grid) {
        if !self.alive {
            return;
        }
        for &pos in &self.segments {
            grid.paint(pos, Cell::Snake(self.color));
            ghost.paint(pos, Cell::Snake(self.color));
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Growth still owed from food already eaten
    pub fn pending_growth(&self) -> usize {
        self.pending_growth
    }
}
