use super::state::Position;

/// Content of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Food,
    /// Occupied by the snake with this color
    Snake(u8),
}

/// Fixed-size occupancy grid, rebuilt from scratch every tick
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position lies inside the grid
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Reset every cell to [`Cell::Empty`]
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Set a cell.
    ///
    /// # Panics
    ///
    /// Painting outside the grid is a programming error: dead snakes are never
    /// drawn, so an out-of-bounds coordinate here means an invariant broke.
    pub fn paint(&mut self, pos: Position, cell: Cell) {
        assert!(
            self.contains(pos),
            "painted {:?} outside {}x{} grid",
            pos,
            self.width,
            self.height
        );
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Cell at a position, `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.contains(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    /// All coordinates holding `tag`, in row-major order
    pub fn cells_with_tag(&self, tag: Cell) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == tag)
            .map(|(idx, _)| Position::new((idx % self.width) as i32, (idx / self.width) as i32))
            .collect()
    }

    /// Number of cells holding `tag`
    pub fn count(&self, tag: Cell) -> usize {
        self.cells.iter().filter(|cell| **cell == tag).count()
    }

    /// Iterate over `(position, cell)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(idx, cell)| {
            (
                Position::new((idx % self.width) as i32, (idx / self.width) as i32),
                *cell,
            )
        })
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.count(Cell::Empty), 12);
        assert_eq!(grid.cells_with_tag(Cell::Empty).len(), 12);
    }

    #[test]
    fn test_paint_and_clear() {
        let mut grid = Grid::new(5, 5);
        grid.paint(Position::new(1, 2), Cell::Food);
        grid.paint(Position::new(4, 4), Cell::Snake(2));

        assert_eq!(grid.get(Position::new(1, 2)), Some(Cell::Food));
        assert_eq!(grid.get(Position::new(4, 4)), Some(Cell::Snake(2)));
        assert_eq!(grid.cells_with_tag(Cell::Food), vec![Position::new(1, 2)]);

        grid.clear();
        assert_eq!(grid.count(Cell::Empty), 25);
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(10, 6);
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(9, 5)));
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(10, 0)));
        assert!(!grid.contains(Position::new(0, 6)));
        assert_eq!(grid.get(Position::new(10, 0)), None);
    }

    #[test]
    fn test_cells_with_tag_uses_xy_coordinates() {
        let mut grid = Grid::new(3, 2);
        grid.paint(Position::new(2, 1), Cell::Snake(4));
        assert_eq!(
            grid.cells_with_tag(Cell::Snake(4)),
            vec![Position::new(2, 1)]
        );
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_paint_panics() {
        let mut grid = Grid::new(3, 3);
        grid.paint(Position::new(3, 0), Cell::Food);
    }
}
