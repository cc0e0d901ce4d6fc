use crate::algorithms::a_star::AStar;
use crate::algorithms::common::{route_cost, PathPlanner, Plan, SearchLimits, SearchTree};
use crate::error::ConfigError;
use crate::grid::{Direction, Grid, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Parameters of the annealing schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingConfig {
    pub max_iterations: usize,
    pub initial_temperature: f64,
    /// Factor applied to the temperature after every iteration, in (0, 1).
    pub cooling_rate: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            max_iterations: 1000,
            initial_temperature: 100.0,
            cooling_rate: 0.95,
        }
    }
}

impl AnnealingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(ConfigError::InvalidTemperature(self.initial_temperature));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ConfigError::InvalidCoolingRate(self.cooling_rate));
        }
        Ok(())
    }
}

/// Refines an A* route by simulated annealing.
///
/// Each iteration swaps one interior waypoint for another cell adjacent to
/// both of its neighbours, re-validates the whole route against the moving
/// obstacles and keeps it under the Metropolis rule. The result is always a
/// feasible route no more expensive than the A* seed, but not necessarily
/// the cheapest one. Without an A* route there is nothing to refine and the
/// planner returns `None`.
pub struct SimulatedAnnealing<'a, R = StdRng> {
    grid: &'a Grid,
    config: AnnealingConfig,
    limits: SearchLimits,
    rng: R,
    accepted: usize,
}

impl<'a> SimulatedAnnealing<'a, StdRng> {
    pub fn new(grid: &'a Grid, config: AnnealingConfig) -> Result<Self, ConfigError> {
        Self::with_rng(grid, config, StdRng::from_entropy())
    }

    /// Reproducible planner for a fixed seed.
    pub fn seeded(grid: &'a Grid, config: AnnealingConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(grid, config, StdRng::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> SimulatedAnnealing<'a, R> {
    pub fn with_rng(grid: &'a Grid, config: AnnealingConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(SimulatedAnnealing {
            grid,
            config,
            limits: SearchLimits::default(),
            rng,
            accepted: 0,
        })
    }

    /// Limits handed to the seeding A* search.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Perturbations accepted during the last call to `plan`.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// A cell other than `path[index]` reachable from `path[index - 1]` and
    /// one step from `path[index + 1]`, free at the tick it would be entered.
    fn perturb(&mut self, path: &[Position], index: usize, start_time: usize) -> Option<Position> {
        let prev = path[index - 1];
        let next = path[index + 1];

        let mut directions = Direction::ALL;
        directions.shuffle(&mut self.rng);

        directions.into_iter().find_map(|direction| {
            let candidate = prev.step(direction)?;
            let fits = candidate != path[index]
                && candidate.manhattan(&next) == 1
                && self.grid.is_enterable(candidate, start_time + index);
            fits.then_some(candidate)
        })
    }

    fn accept(&mut self, current_cost: u32, new_cost: u32, temperature: f64) -> bool {
        if new_cost < current_cost {
            return true;
        }
        let delta = f64::from(current_cost) - f64::from(new_cost);
        let probability = if temperature > 0.0 {
            (delta / temperature).exp()
        } else {
            0.0
        };
        self.rng.gen::<f64>() < probability
    }
}

impl<R: Rng> PathPlanner for SimulatedAnnealing<'_, R> {
    fn name(&self) -> &'static str {
        "sa"
    }

    fn plan(&mut self, start: Position, goal: Position, start_time: usize) -> Option<Plan> {
        self.accepted = 0;
        let seed = AStar::new(self.grid)
            .with_limits(self.limits)
            .plan(start, goal, start_time)?;

        let mut current_path = seed.path.clone();
        let mut current_cost = seed.cost;
        let mut best_path = seed.path;
        let mut best_cost = seed.cost;
        let mut temperature = self.config.initial_temperature;

        for _ in 0..self.config.max_iterations {
            if current_path.len() <= 2 {
                break;
            }

            let index = self.rng.gen_range(1..current_path.len() - 1);
            if let Some(replacement) = self.perturb(&current_path, index, start_time) {
                let mut candidate = current_path.clone();
                candidate[index] = replacement;

                if let Some(new_cost) = route_cost(self.grid, &candidate, start_time) {
                    if self.accept(current_cost, new_cost, temperature) {
                        current_path = candidate;
                        current_cost = new_cost;
                        self.accepted += 1;

                        if current_cost < best_cost {
                            best_cost = current_cost;
                            best_path = current_path.clone();
                        }
                    }
                }
            }

            temperature *= self.config.cooling_rate;
        }

        debug!(
            ?start,
            ?goal,
            seed_cost = seed.cost,
            best_cost,
            accepted = self.accepted,
            "annealing finished"
        );

        let (tree, last) = SearchTree::from_path(self.grid, &best_path, start_time)?;
        Some(tree.plan_to(last, seed.expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Terrain;
    use crate::obstacle::MovingObstacle;

    fn annealer(grid: &Grid, seed: u64) -> SimulatedAnnealing<'_> {
        SimulatedAnnealing::seeded(grid, AnnealingConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_perturb_swaps_the_corner() {
        let grid = Grid::new(3, 3).unwrap();
        let corner = [Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)];
        for seed in 0..16 {
            assert_eq!(annealer(&grid, seed).perturb(&corner, 1, 0), Some(Position::new(0, 1)));
        }
    }

    #[test]
    fn test_perturb_has_nothing_to_offer() {
        let open = Grid::new(3, 3).unwrap();
        let straight = [Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)];

        let mut walled = Grid::new(3, 3).unwrap();
        walled.add_wall(Position::new(0, 1)).unwrap();
        let corner = [Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)];

        for seed in 0..16 {
            assert_eq!(annealer(&open, seed).perturb(&straight, 1, 0), None);
            assert_eq!(annealer(&walled, seed).perturb(&corner, 1, 0), None);
        }
    }

    #[test]
    fn test_perturb_checks_the_entry_tick() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.add_moving_obstacle(
            MovingObstacle::new(vec![Position::new(2, 2), Position::new(0, 1)], 1).unwrap(),
        );
        let corner = [Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)];

        // The alternative corner is occupied at tick 1 and free at tick 2.
        assert_eq!(annealer(&grid, 1).perturb(&corner, 1, 0), None);
        assert_eq!(annealer(&grid, 1).perturb(&corner, 1, 1), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_acceptance_rule() {
        let grid = Grid::new(2, 2).unwrap();
        let mut sa = annealer(&grid, 5);
        for _ in 0..50 {
            assert!(sa.accept(10, 9, 0.0));
            assert!(sa.accept(10, 9, 1e-9));
            assert!(sa.accept(10, 10, 1.0));
            assert!(!sa.accept(10, 11, 0.0));
            assert!(!sa.accept(10, 110, 1e-3));
        }
    }

    #[test]
    fn test_equal_cost_detours_are_accepted() {
        let grid = Grid::new(2, 2).unwrap();
        let config = AnnealingConfig {
            max_iterations: 10,
            ..AnnealingConfig::default()
        };
        let mut annealer = SimulatedAnnealing::seeded(&grid, config, 11).unwrap();

        let plan = annealer.plan(Position::new(0, 0), Position::new(1, 1), 0).unwrap();
        // Every iteration flips the route to the other corner at the same cost.
        assert_eq!(annealer.accepted(), 10);
        assert_eq!(plan.cost, 2);
        assert_eq!(route_cost(&grid, &plan.path, 0), Some(2));

        assert!(annealer.plan(Position::new(0, 0), Position::new(0, 0), 0).is_some());
        assert_eq!(annealer.accepted(), 0);
    }

    #[test]
    fn test_config_validation() {
        assert!(AnnealingConfig::default().validate().is_ok());

        let bad_cooling = AnnealingConfig {
            cooling_rate: 1.0,
            ..AnnealingConfig::default()
        };
        assert_eq!(bad_cooling.validate(), Err(ConfigError::InvalidCoolingRate(1.0)));

        let bad_temperature = AnnealingConfig {
            initial_temperature: 0.0,
            ..AnnealingConfig::default()
        };
        assert!(SimulatedAnnealing::new(&Grid::new(2, 2).unwrap(), bad_temperature).is_err());

        let no_iterations = AnnealingConfig {
            max_iterations: 0,
            ..AnnealingConfig::default()
        };
        assert_eq!(no_iterations.validate(), Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn test_refines_obstacle_grid() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.add_wall(Position::new(2, 2)).unwrap();
        let config = AnnealingConfig {
            max_iterations: 100,
            ..AnnealingConfig::default()
        };

        let plan = SimulatedAnnealing::seeded(&grid, config, 7)
            .unwrap()
            .plan(Position::new(0, 0), Position::new(4, 4), 0)
            .unwrap();
        assert_eq!(plan.path[0], Position::new(0, 0));
        assert_eq!(plan.goal(), Position::new(4, 4));
        assert_eq!(route_cost(&grid, &plan.path, 0), Some(plan.cost));
        assert!(plan.cost <= 8);
    }

    #[test]
    fn test_never_worse_than_seed() {
        let mut grid = Grid::new(6, 6).unwrap();
        grid.fill_terrain(1..5, 1..5, Terrain::Mud);
        let (start, goal) = (Position::new(0, 0), Position::new(5, 5));
        let seed = AStar::new(&grid).plan(start, goal, 0).unwrap();

        for rng_seed in 0..10 {
            let plan = SimulatedAnnealing::seeded(&grid, AnnealingConfig::default(), rng_seed)
                .unwrap()
                .plan(start, goal, 0)
                .unwrap();
            assert!(plan.cost <= seed.cost);
            assert_eq!(route_cost(&grid, &plan.path, 0), Some(plan.cost));
        }
    }

    #[test]
    fn test_unreachable_goal_returns_none() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.add_wall(Position::new(1, 0)).unwrap();
        let mut planner = SimulatedAnnealing::seeded(&grid, AnnealingConfig::default(), 1).unwrap();
        assert!(planner.plan(Position::new(0, 0), Position::new(2, 0), 0).is_none());
    }

    #[test]
    fn test_short_paths_are_returned_unchanged() {
        let grid = Grid::new(3, 3).unwrap();
        let mut planner = SimulatedAnnealing::seeded(&grid, AnnealingConfig::default(), 3).unwrap();

        let same = planner.plan(Position::new(1, 1), Position::new(1, 1), 0).unwrap();
        assert_eq!(same.path, vec![Position::new(1, 1)]);
        assert_eq!(same.cost, 0);

        let adjacent = planner.plan(Position::new(1, 1), Position::new(2, 1), 4).unwrap();
        assert_eq!(adjacent.path, vec![Position::new(1, 1), Position::new(2, 1)]);
        assert_eq!(adjacent.start_time, 4);
    }
}
