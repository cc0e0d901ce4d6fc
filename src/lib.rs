//! Time-aware route planning for a delivery agent on a grid with terrain
//! costs, walls and obstacles that patrol fixed cyclic paths.
//!
//! Planners ([`algorithms`]) search over (cell, tick) states so a cell that
//! is blocked now can still be entered once the obstacle has moved on.

pub mod agent;
pub mod algorithms;
pub mod config;
pub mod error;
pub mod grid;
pub mod grid_file;
pub mod maps;
pub mod obstacle;
pub mod simulation;
pub mod statistics;

pub use algorithms::common::{PathPlanner, Plan, SearchLimits};
pub use algorithms::Algorithm;
pub use error::{ConfigError, GridFileError, MissionError};
pub use grid::{Grid, Position, Terrain};
pub use obstacle::MovingObstacle;
