use super::Observation;
use crate::game::Cell;

/// Number of planes in an encoded observation
pub const CHANNELS: usize = 4;

/// Channel holding the observing snake's head
pub const HEAD: usize = 0;
/// Channel holding the observing snake's body, head excluded
pub const BODY: usize = 1;
/// Channel holding every other snake
pub const OTHERS: usize = 2;
/// Channel holding food
pub const FOOD: usize = 3;

/// Create a 4-channel observation from one snake's point of view
///
/// Channels:
/// - 0: Own head (1.0 at head position)
/// - 1: Own body (1.0 at own cells other than the head)
/// - 2: Other snakes (1.0 at any cell painted by another color)
/// - 3: Food (1.0 at food positions)
///
/// Returns a flat `Vec<f32>` laid out as `[channel][y][x]`, i.e. shape
/// `[4, height, width]`.
pub fn create_observation(observation: &Observation<'_>) -> Vec<f32> {
    let grid = observation.grid;
    let width = grid.width();
    let plane = width * grid.height();
    let mut data = vec![0.0; CHANNELS * plane];

    for (pos, cell) in grid.iter() {
        let idx = (pos.y as usize) * width + (pos.x as usize);
        match cell {
            Cell::Snake(color) if color == observation.color => {
                if pos == observation.head {
                    data[HEAD * plane + idx] = 1.0;
                } else {
                    data[BODY * plane + idx] = 1.0;
                }
            }
            Cell::Snake(_) => data[OTHERS * plane + idx] = 1.0,
            Cell::Food => data[FOOD * plane + idx] = 1.0,
            Cell::Empty => {}
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Grid, Position, Snake};

    fn plane_sum(data: &[f32], channel: usize, plane: usize) -> f32 {
        data[channel * plane..(channel + 1) * plane].iter().sum()
    }

    fn scene() -> (Grid, Snake) {
        let mut grid = Grid::new(20, 20);
        let mut ghost = Grid::new(20, 20);
        let me = Snake::new(2, Position::new(5, 5), Direction::Right, 4, 100);
        let other = Snake::new(4, Position::new(12, 3), Direction::Down, 2, 100);
        me.draw(&mut grid, &mut ghost);
        other.draw(&mut grid, &mut ghost);
        grid.paint(Position::new(10, 12), Cell::Food);
        (grid, me)
    }

    #[test]
    fn test_observation_shape() {
        let (grid, me) = scene();
        let data = create_observation(&Observation::of(&grid, &me));
        assert_eq!(data.len(), 4 * 20 * 20);
    }

    #[test]
    fn test_head_channel() {
        let (grid, me) = scene();
        let data = create_observation(&Observation::of(&grid, &me));

        assert_eq!(data[HEAD * 400 + 5 * 20 + 5], 1.0);
        assert_eq!(plane_sum(&data, HEAD, 400), 1.0);
    }

    #[test]
    fn test_body_channel() {
        let (grid, me) = scene();
        let data = create_observation(&Observation::of(&grid, &me));

        // length 4, so three body cells
        assert_eq!(plane_sum(&data, BODY, 400), 3.0);
        assert_eq!(data[BODY * 400 + 5 * 20 + 5], 0.0);
    }

    #[test]
    fn test_other_and_food_channels() {
        let (grid, me) = scene();
        let data = create_observation(&Observation::of(&grid, &me));

        assert_eq!(plane_sum(&data, OTHERS, 400), 2.0);
        assert_eq!(data[OTHERS * 400 + 3 * 20 + 12], 1.0);
        assert_eq!(data[FOOD * 400 + 12 * 20 + 10], 1.0);
        assert_eq!(plane_sum(&data, FOOD, 400), 1.0);
    }

    #[test]
    fn test_point_of_view_swaps_channels() {
        let (grid, _) = scene();
        let other = Snake::new(4, Position::new(12, 3), Direction::Down, 2, 100);
        let data = create_observation(&Observation::of(&grid, &other));

        assert_eq!(plane_sum(&data, HEAD, 400), 1.0);
        assert_eq!(plane_sum(&data, BODY, 400), 1.0);
        assert_eq!(plane_sum(&data, OTHERS, 400), 4.0);
    }

    #[test]
    fn test_observation_values_in_range() {
        let (grid, me) = scene();
        for value in create_observation(&Observation::of(&grid, &me)) {
            assert!(value == 0.0 || value == 1.0);
        }
    }
}
