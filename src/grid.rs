use std::fmt::Write as _;

use crate::error::ConfigError;
use crate::obstacle::MovingObstacle;

/// Longest obstacle cycle that planners fold time into.
/// Worlds whose combined cycle is longer are searched on absolute time.
const MAX_PHASE_PERIOD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighbouring position in `direction`, or `None` below zero.
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Expansion order shared by every planner.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

/// Terrain kinds and the cost of entering them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Terrain {
    #[default]
    Road,
    Grass,
    Mud,
    Water,
}

impl Terrain {
    pub const fn cost(self) -> u32 {
        match self {
            Terrain::Road => 1,
            Terrain::Grass => 3,
            Terrain::Mud => 5,
            Terrain::Water => 10,
        }
    }

    /// Cheapest cost of entering any cell; admissible heuristics rely on it.
    pub const MIN_COST: u32 = 1;

    fn symbol(self) -> char {
        match self {
            Terrain::Road => '.',
            Terrain::Grass => ',',
            Terrain::Mud => '~',
            Terrain::Water => 'w',
        }
    }
}

impl TryFrom<u32> for Terrain {
    type Error = ConfigError;

    fn try_from(cost: u32) -> Result<Self, Self::Error> {
        match cost {
            1 => Ok(Terrain::Road),
            3 => Ok(Terrain::Grass),
            5 => Ok(Terrain::Mud),
            10 => Ok(Terrain::Water),
            other => Err(ConfigError::UnknownTerrainCost(other)),
        }
    }
}

/// The world a delivery agent moves through.
///
/// Walls and terrain are fixed once planning begins. Moving obstacles are
/// only advanced by [`Grid::update_moving_obstacles`]; planners query their
/// future positions through [`Grid::is_enterable`] without mutating them.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Cell>>,
    pub terrain: Vec<Vec<Terrain>>,
    moving_obstacles: Vec<MovingObstacle>,
}

impl Grid {
    /// Creates an all-road grid without walls or moving obstacles.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }

        Ok(Grid {
            width,
            height,
            cells: vec![vec![Cell::Empty; height]; width],
            terrain: vec![vec![Terrain::Road; height]; width],
            moving_obstacles: Vec::new(),
        })
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn check_bounds(&self, pos: Position) -> Result<(), ConfigError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(ConfigError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn add_wall(&mut self, pos: Position) -> Result<(), ConfigError> {
        self.check_bounds(pos)?;
        self.cells[pos.x][pos.y] = Cell::Wall;
        Ok(())
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.cells[pos.x][pos.y] == Cell::Wall
    }

    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> Result<(), ConfigError> {
        self.check_bounds(pos)?;
        self.terrain[pos.x][pos.y] = terrain;
        Ok(())
    }

    /// Paints every cell of the rectangle `[x0, x1) x [y0, y1)`, clipped to the grid.
    pub fn fill_terrain(&mut self, xs: std::ops::Range<usize>, ys: std::ops::Range<usize>, terrain: Terrain) {
        for x in xs.start..xs.end.min(self.width) {
            for y in ys.start..ys.end.min(self.height) {
                self.terrain[x][y] = terrain;
            }
        }
    }

    pub fn terrain_at(&self, pos: Position) -> Terrain {
        self.terrain[pos.x][pos.y]
    }

    /// Cost of entering `pos`. Terrain does not change over time.
    ///
    /// Panics if `pos` is outside the grid; planners only ask about cells
    /// that passed [`Grid::is_enterable`].
    pub fn cost_of(&self, pos: Position) -> u32 {
        debug_assert!(
            self.in_bounds(pos),
            "cost_of({pos:?}) outside {}x{}",
            self.width,
            self.height
        );
        self.terrain_at(pos).cost()
    }

    pub fn add_moving_obstacle(&mut self, obstacle: MovingObstacle) {
        self.moving_obstacles.push(obstacle);
    }

    pub fn moving_obstacles(&self) -> &[MovingObstacle] {
        &self.moving_obstacles
    }

    /// Advances every moving obstacle by one tick.
    pub fn update_moving_obstacles(&mut self) {
        for obstacle in &mut self.moving_obstacles {
            obstacle.advance();
        }
    }

    /// Whether `pos` can be occupied `time_step` ticks from the obstacles' current state.
    pub fn is_enterable(&self, pos: Position, time_step: usize) -> bool {
        if !self.in_bounds(pos) || self.cells[pos.x][pos.y] == Cell::Wall {
            return false;
        }

        !self
            .moving_obstacles
            .iter()
            .any(|obstacle| obstacle.position_at(time_step) == pos)
    }

    /// In-bounds orthogonal neighbours in [`Direction::ALL`] order.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| pos.step(direction))
            .filter(move |next| self.in_bounds(*next))
    }

    /// Number of ticks after which every moving obstacle is back where it
    /// started, or `None` if that cycle is too long to be useful.
    pub fn obstacle_period(&self) -> Option<usize> {
        self.moving_obstacles
            .iter()
            .try_fold(1usize, |period, obstacle| {
                let cycle = obstacle.period();
                let lcm = (period / gcd(period, cycle)).checked_mul(cycle)?;
                (lcm <= MAX_PHASE_PERIOD).then_some(lcm)
            })
    }

    /// Renders the grid with walls, terrain, current obstacle positions and an optional agent.
    pub fn render(&self, agent_pos: Option<Position>) -> String {
        let mut out = String::new();
        out.push_str("Legend: A=Agent, #=Wall, O=Obstacle, .=Road, ,=Grass, ~=Mud, w=Water\n");

        out.push_str("   ");
        for x in 0..self.width {
            let _ = write!(out, "{:2}", x % 10);
        }
        out.push('\n');

        for y in 0..self.height {
            let _ = write!(out, "{:2} ", y);

            for x in 0..self.width {
                let pos = Position { x, y };
                let symbol = if Some(pos) == agent_pos {
                    'A'
                } else if self.cells[x][y] == Cell::Wall {
                    '#'
                } else if self.moving_obstacles.iter().any(|o| o.position() == pos) {
                    'O'
                } else {
                    self.terrain[x][y].symbol()
                };
                let _ = write!(out, "{} ", symbol);
            }
            out.push('\n');
        }
        out
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_dimensions() {
        assert_eq!(
            Grid::new(0, 5).unwrap_err(),
            ConfigError::InvalidDimensions { width: 0, height: 5 }
        );
        assert!(Grid::new(3, 0).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn test_is_enterable_bounds_and_walls() {
        let mut grid = Grid::new(10, 10).unwrap();
        assert!(grid.is_enterable(Position::new(0, 0), 0));
        assert!(grid.is_enterable(Position::new(9, 9), 0));
        assert!(!grid.is_enterable(Position::new(10, 9), 0));
        assert!(!grid.is_enterable(Position::new(9, 10), 0));

        grid.add_wall(Position::new(5, 5)).unwrap();
        assert!(!grid.is_enterable(Position::new(5, 5), 0));
        assert!(!grid.is_enterable(Position::new(5, 5), 42));
        assert!(grid.add_wall(Position::new(10, 0)).is_err());
    }

    #[test]
    fn test_terrain_costs() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert_eq!(grid.cost_of(Position::new(3, 3)), 1);

        grid.set_terrain(Position::new(3, 3), Terrain::Mud).unwrap();
        assert_eq!(grid.cost_of(Position::new(3, 3)), 5);
        assert_eq!(Terrain::try_from(10), Ok(Terrain::Water));
        assert_eq!(Terrain::try_from(2), Err(ConfigError::UnknownTerrainCost(2)));
    }

    #[test]
    #[should_panic]
    fn test_cost_of_outside_grid_panics() {
        Grid::new(2, 2).unwrap().cost_of(Position::new(2, 0));
    }

    #[test]
    fn test_moving_obstacle_blocks_by_time() {
        let mut grid = Grid::new(5, 5).unwrap();
        let path = vec![Position::new(1, 0), Position::new(2, 0)];
        grid.add_moving_obstacle(MovingObstacle::new(path, 1).unwrap());

        assert!(!grid.is_enterable(Position::new(1, 0), 0));
        assert!(grid.is_enterable(Position::new(2, 0), 0));
        assert!(!grid.is_enterable(Position::new(2, 0), 1));
        assert!(grid.is_enterable(Position::new(1, 0), 1));

        grid.update_moving_obstacles();
        assert!(!grid.is_enterable(Position::new(2, 0), 0));
    }

    #[test]
    fn test_neighbors_stay_in_bounds() {
        let grid = Grid::new(3, 3).unwrap();
        let corner: Vec<_> = grid.neighbors(Position::new(0, 0)).collect();
        assert_eq!(corner, vec![Position::new(0, 1), Position::new(1, 0)]);
        assert_eq!(grid.neighbors(Position::new(1, 1)).count(), 4);
    }

    #[test]
    fn test_obstacle_period_is_lcm() {
        let mut grid = Grid::new(8, 8).unwrap();
        assert_eq!(grid.obstacle_period(), Some(1));

        let square = vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
            Position::new(1, 0),
        ];
        grid.add_moving_obstacle(MovingObstacle::new(square, 1).unwrap());
        grid.add_moving_obstacle(
            MovingObstacle::new(vec![Position::new(5, 5), Position::new(6, 5), Position::new(7, 5)], 2).unwrap(),
        );
        assert_eq!(grid.obstacle_period(), Some(12));
    }

    #[test]
    fn test_render_marks_agent_and_walls() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.add_wall(Position::new(1, 0)).unwrap();
        let text = grid.render(Some(Position::new(0, 1)));
        assert!(text.contains(" 0 . # . "));
        assert!(text.contains(" 1 A . . "));
    }
}
