/// Number of discrete actions a policy can choose from
pub const ACTION_COUNT: usize = 5;

/// Direction a snake can travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in action-index order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Action index that selects this direction
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Action a snake can take on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Turn to (or keep) a specific heading, reversal included
    Move(Direction),
    /// Keep the current heading
    Continue,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}

/// Convert a discrete action index to an [`Action`]
///
/// - 0 → Move Up
/// - 1 → Move Down
/// - 2 → Move Left
/// - 3 → Move Right
/// - 4 and anything else → Continue
pub fn action_from_index(idx: usize) -> Action {
    match idx {
        0 => Action::Move(Direction::Up),
        1 => Action::Move(Direction::Down),
        2 => Action::Move(Direction::Left),
        3 => Action::Move(Direction::Right),
        _ => Action::Continue,
    }
}
