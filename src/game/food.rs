use rand::Rng;

use super::error::SimError;
use super::grid::{Cell, Grid};
use super::state::Position;

/// Fixed-count set of food items on the grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodRegistry {
    items: Vec<Position>,
}

impl FoodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding exactly these items, in registration order
    pub fn from_items(items: Vec<Position>) -> Self {
        Self { items }
    }

    /// Place `count` items on uniformly random empty cells.
    ///
    /// Each item is painted as soon as it is placed so later samples cannot
    /// land on it.
    pub fn seed<R: Rng>(&mut self, count: usize, grid: &mut Grid, rng: &mut R) -> Result<(), SimError> {
        self.items.clear();
        for _ in 0..count {
            let pos = sample_empty(grid, rng, |_| false)?;
            grid.paint(pos, Cell::Food);
            self.items.push(pos);
        }
        Ok(())
    }

    /// Replace the item at `consumed` with one on a fresh empty cell.
    ///
    /// Cells for which `occupied` returns true are skipped even when the grid
    /// snapshot still shows them empty. The new item is painted and appended.
    pub fn respawn_one<R, F>(
        &mut self,
        consumed: Position,
        grid: &mut Grid,
        rng: &mut R,
        occupied: F,
    ) -> Result<Position, SimError>
    where
        R: Rng,
        F: Fn(Position) -> bool,
    {
        let fresh = sample_empty(grid, rng, occupied)?;
        grid.paint(fresh, Cell::Food);

        if let Some(idx) = self.items.iter().position(|&item| item == consumed) {
            self.items.remove(idx);
        }
        self.items.push(fresh);

        Ok(fresh)
    }

    /// Food coordinates in registration order
    pub fn items(&self) -> &[Position] {
        &self.items
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.items.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Paint every item into the grid
    pub fn draw(&self, grid: &mut Grid) {
        for &pos in &self.items {
            grid.paint(pos, Cell::Food);
        }
    }
}

fn sample_empty<R, F>(grid: &Grid, rng: &mut R, occupied: F) -> Result<Position, SimError>
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    let candidates: Vec<Position> = grid
        .cells_with_tag(Cell::Empty)
        .into_iter()
        .filter(|&pos| !occupied(pos))
        .collect();

    if candidates.is_empty() {
        return Err(SimError::NoEmptyCell {
            width: grid.width(),
            height: grid.height(),
        });
    }

    Ok(candidates[rng.gen_range(0..candidates.len())])
}
