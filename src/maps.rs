//! Built-in worlds used by the experiments and the command line.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;
use crate::grid::{Grid, Position, Terrain};
use crate::obstacle::MovingObstacle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum MapKind {
    /// 10x10, a short wall with grass and mud bands
    Small,
    /// 20x20, a walled cross over grass, mud and water
    Medium,
    /// 50x50, randomly scattered walls
    Large,
    /// 15x15 with a patrolling obstacle
    Dynamic,
}

impl MapKind {
    pub const ALL: [MapKind; 4] = [MapKind::Small, MapKind::Medium, MapKind::Large, MapKind::Dynamic];

    pub fn name(self) -> &'static str {
        match self {
            MapKind::Small => "small",
            MapKind::Medium => "medium",
            MapKind::Large => "large",
            MapKind::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A world together with the agent's start and itinerary.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub grid: Grid,
    pub start: Position,
    pub packages: Vec<Position>,
    pub destinations: Vec<Position>,
}

impl Scenario {
    /// Builds the scenario for `kind`. `seed` only affects the large map.
    pub fn build(kind: MapKind, seed: Option<u64>) -> Result<Self, ConfigError> {
        match kind {
            MapKind::Small => small(),
            MapKind::Medium => medium(),
            MapKind::Large => large(seed),
            MapKind::Dynamic => dynamic(),
        }
    }

    pub fn stops(&self) -> impl Iterator<Item = Position> + '_ {
        self.packages.iter().chain(&self.destinations).copied()
    }
}

fn small() -> Result<Scenario, ConfigError> {
    let mut grid = Grid::new(10, 10)?;
    for x in 3..7 {
        grid.add_wall(Position::new(x, 5))?;
    }
    grid.fill_terrain(0..10, 0..3, Terrain::Grass);
    grid.fill_terrain(0..10, 7..10, Terrain::Mud);

    Ok(Scenario {
        grid,
        start: Position::new(0, 0),
        packages: vec![Position::new(9, 9)],
        destinations: vec![Position::new(5, 2)],
    })
}

fn medium() -> Result<Scenario, ConfigError> {
    let mut grid = Grid::new(20, 20)?;
    for i in 5..15 {
        grid.add_wall(Position::new(i, 10))?;
        grid.add_wall(Position::new(10, i))?;
    }
    grid.fill_terrain(0..20, 0..5, Terrain::Grass);
    grid.fill_terrain(0..20, 15..20, Terrain::Mud);
    grid.fill_terrain(0..5, 0..20, Terrain::Water);

    Ok(Scenario {
        grid,
        start: Position::new(0, 0),
        packages: vec![Position::new(19, 19)],
        // Just above the cross; its vertical arm starts at (10, 5)
        destinations: vec![Position::new(10, 4)],
    })
}

fn large(seed: Option<u64>) -> Result<Scenario, ConfigError> {
    const SIZE: usize = 50;
    const WALLS: usize = 100;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = Position::new(0, 0);
    let packages = vec![Position::new(45, 45)];
    let destinations = vec![Position::new(10, 10)];

    let mut grid = Grid::new(SIZE, SIZE)?;
    for _ in 0..WALLS {
        let pos = Position::new(rng.gen_range(0..SIZE), rng.gen_range(0..SIZE));
        // Never wall in the agent or a stop
        if pos != start && !packages.contains(&pos) && !destinations.contains(&pos) {
            grid.add_wall(pos)?;
        }
    }
    grid.fill_terrain(0..SIZE, 0..10, Terrain::Grass);
    grid.fill_terrain(0..SIZE, 40..SIZE, Terrain::Mud);
    grid.fill_terrain(0..10, 0..SIZE, Terrain::Water);

    Ok(Scenario {
        grid,
        start,
        packages,
        destinations,
    })
}

fn dynamic() -> Result<Scenario, ConfigError> {
    let mut grid = Grid::new(15, 15)?;
    for x in 5..10 {
        grid.add_wall(Position::new(x, 7))?;
    }

    let patrol = [(3, 3), (3, 4), (3, 5), (4, 5), (5, 5), (5, 4), (5, 3), (4, 3)]
        .into_iter()
        .map(|(x, y)| Position::new(x, y))
        .collect();
    grid.add_moving_obstacle(MovingObstacle::new(patrol, 2)?);
    grid.fill_terrain(0..15, 0..5, Terrain::Grass);

    Ok(Scenario {
        grid,
        start: Position::new(0, 0),
        packages: vec![Position::new(12, 12)],
        destinations: vec![Position::new(7, 3)],
    })
}
