use std::path::PathBuf;

use clap::Parser;

use crate::algorithms::common::SearchLimits;
use crate::algorithms::simulated_annealing::AnnealingConfig;
use crate::algorithms::Algorithm;
use crate::error::ConfigError;
use crate::grid::Position;
use crate::maps::MapKind;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Built-in map to run on; ignored when --grid-file is given
    #[arg(long, value_enum, default_value_t = MapKind::Small)]
    pub map: MapKind,

    /// Load the world from a grid file instead of a built-in map
    #[arg(long)]
    pub grid_file: Option<PathBuf>,

    /// Agent start cell as x,y (grid files only)
    #[arg(long, value_parser = parse_position, default_value = "0,0")]
    pub start: Position,

    /// Package pickup cell as x,y; repeatable (grid files only)
    #[arg(long = "package", value_parser = parse_position)]
    pub packages: Vec<Position>,

    /// Delivery cell as x,y; repeatable (grid files only)
    #[arg(long = "destination", value_parser = parse_position)]
    pub destinations: Vec<Position>,

    /// bfs, ucs, a_star, sa or all
    #[arg(long, default_value = "a_star")]
    pub algorithm: String,

    #[arg(long, default_value_t = 1000)]
    pub fuel: u32,

    /// Seed for map generation and annealing
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 1000)]
    pub max_iterations: usize,

    #[arg(long, default_value_t = 100.0)]
    pub initial_temperature: f64,

    #[arg(long, default_value_t = 0.95)]
    pub cooling_rate: f64,

    /// Longest route, in moves, a search will consider
    #[arg(long, default_value_t = 10_000)]
    pub max_steps: usize,

    /// States a search may expand before giving up
    #[arg(long, default_value_t = 2_000_000)]
    pub max_expansions: usize,

    /// Write the world to this grid file before running
    #[arg(long)]
    pub save_map: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,
}

impl Config {
    /// The algorithms selected by `--algorithm`, expanding `all`.
    pub fn algorithms(&self) -> Result<Vec<Algorithm>, ConfigError> {
        if self.algorithm == "all" {
            return Ok(Algorithm::ALL.to_vec());
        }
        Ok(vec![self.algorithm.parse()?])
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            limits: SearchLimits {
                max_steps: self.max_steps,
                max_expansions: self.max_expansions,
            },
            annealing: AnnealingConfig {
                max_iterations: self.max_iterations,
                initial_temperature: self.initial_temperature,
                cooling_rate: self.cooling_rate,
            },
            seed: self.seed,
        }
    }
}

/// Everything a planner needs besides the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlannerConfig {
    pub limits: SearchLimits,
    pub annealing: AnnealingConfig,
    pub seed: Option<u64>,
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        self.annealing.validate()
    }
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("invalid x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("invalid y in `{s}`: {e}"))?;
    Ok(Position { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_planner_defaults() {
        let config = Config::parse_from(["delivery_planner"]);
        assert_eq!(config.planner_config(), PlannerConfig::default());
        assert_eq!(config.algorithms().unwrap(), vec![Algorithm::AStar]);
        assert_eq!(config.start, Position::new(0, 0));
    }

    #[test]
    fn test_parses_stops_and_all() {
        let config = Config::parse_from([
            "delivery_planner",
            "--algorithm",
            "all",
            "--package",
            "3,4",
            "--package",
            "1, 2",
            "--destination",
            "9,9",
        ]);
        assert_eq!(config.algorithms().unwrap().len(), 4);
        assert_eq!(config.packages, vec![Position::new(3, 4), Position::new(1, 2)]);
        assert_eq!(config.destinations, vec![Position::new(9, 9)]);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,1").is_err());
        assert!(Config::try_parse_from(["delivery_planner", "--start", "1;1"]).is_err());

        let config = Config::parse_from(["delivery_planner", "--algorithm", "greedy"]);
        assert!(config.algorithms().is_err());

        let config = Config::parse_from(["delivery_planner", "--cooling-rate", "1.5"]);
        assert!(config.planner_config().validate().is_err());
    }
}
