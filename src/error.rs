//! Error types for world construction, grid files and delivery missions.
//!
//! Running out of search space is not an error: planners return `None`
//! when no path exists, and callers decide what to do next.

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::Position;

/// Invalid parameters detected while building a world or a planner.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("moving obstacle needs at least one waypoint")]
    EmptyWaypoints,

    #[error("moving obstacle speed must be at least 1, got {0}")]
    InvalidSpeed(usize),

    #[error("moving obstacle cycle of {waypoints} waypoints at speed {speed} is too long")]
    CycleTooLong { waypoints: usize, speed: usize },

    #[error("waypoint index {index} is out of range for a path of {len} waypoints")]
    InvalidWaypointIndex { index: usize, len: usize },

    #[error("cooling rate must be strictly between 0 and 1, got {0}")]
    InvalidCoolingRate(f64),

    #[error("initial temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),

    #[error("annealing needs at least one iteration")]
    ZeroIterations,

    #[error("search limit `{0}` must be positive")]
    ZeroSearchLimit(&'static str),

    #[error("position {pos:?} is outside the {width}x{height} grid")]
    OutOfBounds {
        pos: Position,
        width: usize,
        height: usize,
    },

    #[error("unknown terrain cost {0} (expected 1, 3, 5 or 10)")]
    UnknownTerrainCost(u32),

    #[error("unknown algorithm `{0}` (expected bfs, ucs, a_star or sa)")]
    UnknownAlgorithm(String),
}

/// Failures while reading or writing the plain-text grid format.
#[derive(Debug, Error)]
pub enum GridFileError {
    #[error("failed to access grid file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GridFileError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Reasons a delivery mission stops before visiting every stop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MissionError {
    #[error("no path from {from:?} to {to:?}")]
    NoPath { from: Position, to: Position },

    #[error("out of fuel at {position:?}: next step costs {required}, {remaining} left")]
    OutOfFuel {
        position: Position,
        required: u32,
        remaining: u32,
    },

    #[error("stop {0:?} is not a free cell of the grid")]
    InvalidStop(Position),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
