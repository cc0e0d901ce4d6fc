pub mod a_star;
mod best_first;
pub mod bfs;
pub mod common;
pub mod heuristics;
pub mod simulated_annealing;
pub mod ucs;

use std::fmt;
use std::str::FromStr;

use crate::config::PlannerConfig;
use crate::error::ConfigError;
use crate::grid::Grid;

use a_star::AStar;
use bfs::Bfs;
use common::PathPlanner;
use simulated_annealing::SimulatedAnnealing;
use ucs::Ucs;

/// The planning strategies an agent can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Algorithm {
    Bfs,
    Ucs,
    #[value(name = "a_star")]
    AStar,
    #[value(name = "sa")]
    SimulatedAnnealing,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Ucs,
        Algorithm::AStar,
        Algorithm::SimulatedAnnealing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Ucs => "ucs",
            Algorithm::AStar => "a_star",
            Algorithm::SimulatedAnnealing => "sa",
        }
    }

    /// Builds a planner for `grid`.
    ///
    /// With a configured seed the annealing planner derives its generator
    /// from it, so repeated runs pick the same perturbations.
    pub fn planner<'a>(
        self,
        grid: &'a Grid,
        config: &PlannerConfig,
    ) -> Result<Box<dyn PathPlanner + 'a>, ConfigError> {
        config.limits.validate()?;

        let planner: Box<dyn PathPlanner + 'a> = match self {
            Algorithm::Bfs => Box::new(Bfs::new(grid).with_limits(config.limits)),
            Algorithm::Ucs => Box::new(Ucs::new(grid).with_limits(config.limits)),
            Algorithm::AStar => Box::new(AStar::new(grid).with_limits(config.limits)),
            Algorithm::SimulatedAnnealing => {
                let planner = match config.seed {
                    Some(seed) => SimulatedAnnealing::seeded(grid, config.annealing, seed)?,
                    None => SimulatedAnnealing::new(grid, config.annealing)?,
                };
                Box::new(planner.with_limits(config.limits))
            }
        };
        Ok(planner)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))
    }
}
