use crate::algorithms::Algorithm;
use crate::config::PlannerConfig;
use crate::error::MissionError;
use crate::grid::{Grid, Position};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Snapshot of an agent's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatus {
    pub position: Position,
    pub fuel: u32,
    pub packages_remaining: usize,
    pub route_remaining: usize,
    pub moves: usize,
}

/// Outcome of a completed delivery mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionReport {
    pub moves: usize,
    pub fuel_used: u32,
    pub fuel_remaining: u32,
    pub planning_calls: usize,
    pub expanded: usize,
    pub delivered: usize,
}

/// Executes itineraries on a grid, one planned leg at a time.
///
/// The agent owns its fuel and route; the grid is lent to it for planning
/// and for advancing the moving obstacles after every step it takes.
pub struct DeliveryAgent {
    pub position: Position,
    pub fuel: u32,
    pub packages: Vec<Position>,
    pub destinations: Vec<Position>,
    route: VecDeque<Position>,
    carrying: usize,
    delivered: usize,
    moves: usize,
    fuel_used: u32,
    planning_calls: usize,
    expanded: usize,
}

impl DeliveryAgent {
    pub fn new(start: Position, fuel: u32) -> Self {
        DeliveryAgent {
            position: start,
            fuel,
            packages: Vec::new(),
            destinations: Vec::new(),
            route: VecDeque::new(),
            carrying: 0,
            delivered: 0,
            moves: 0,
            fuel_used: 0,
            planning_calls: 0,
            expanded: 0,
        }
    }

    pub fn add_package(&mut self, pos: Position) {
        self.packages.push(pos);
    }

    pub fn add_destination(&mut self, pos: Position) {
        self.destinations.push(pos);
    }

    pub fn route(&self) -> impl Iterator<Item = &Position> {
        self.route.iter()
    }

    /// Plans from the current cell to `goal` against the grid's current
    /// obstacle state. On success the route, without the current cell,
    /// replaces any previous one.
    pub fn plan_path_to(
        &mut self,
        grid: &Grid,
        goal: Position,
        algorithm: Algorithm,
        config: &PlannerConfig,
    ) -> Result<bool, MissionError> {
        let mut planner = algorithm.planner(grid, config)?;
        self.planning_calls += 1;

        match planner.plan(self.position, goal, 0) {
            Some(plan) => {
                debug!(%algorithm, from = ?self.position, to = ?goal, moves = plan.moves(), cost = plan.cost, "planned leg");
                self.expanded += plan.expanded;
                self.route = plan.path.into_iter().skip(1).collect();
                Ok(true)
            }
            None => {
                self.route.clear();
                Ok(false)
            }
        }
    }

    /// Takes the next step of the route. Returns `false` when the route is used up.
    /// A next cell that is off the grid or walled is refused with
    /// [`MissionError::InvalidStop`] and the route is dropped.
    ///
    /// Entering a cell burns fuel equal to its terrain cost; the step is
    /// refused when that is more than the agent has left. After moving, every
    /// moving obstacle in `grid` advances one tick.
    pub fn execute_step(&mut self, grid: &mut Grid) -> Result<bool, MissionError> {
        let Some(&next) = self.route.front() else {
            return Ok(false);
        };
        // The route may have been planned on a different grid.
        if !grid.in_bounds(next) || grid.is_wall(next) {
            self.route.clear();
            return Err(MissionError::InvalidStop(next));
        }

        let required = grid.cost_of(next);
        if required > self.fuel {
            return Err(MissionError::OutOfFuel {
                position: self.position,
                required,
                remaining: self.fuel,
            });
        }

        self.route.pop_front();
        self.position = next;
        self.fuel -= required;
        self.fuel_used += required;
        self.moves += 1;
        grid.update_moving_obstacles();

        if let Some(index) = self.packages.iter().position(|&p| p == next) {
            self.packages.remove(index);
            self.carrying += 1;
            info!(position = ?next, "picked up package");
        }
        Ok(true)
    }

    /// Drives the agent to `goal`, replanning if a predicted cell turns out blocked.
    fn travel_to(
        &mut self,
        grid: &mut Grid,
        goal: Position,
        algorithm: Algorithm,
        config: &PlannerConfig,
    ) -> Result<(), MissionError> {
        if !self.plan_path_to(grid, goal, algorithm, config)? {
            return Err(MissionError::NoPath {
                from: self.position,
                to: goal,
            });
        }

        while self.position != goal {
            let blocked = self.route.front().is_some_and(|&next| !grid.is_enterable(next, 1));
            if blocked {
                warn!(position = ?self.position, "route blocked, replanning");
                if !self.plan_path_to(grid, goal, algorithm, config)? {
                    return Err(MissionError::NoPath {
                        from: self.position,
                        to: goal,
                    });
                }
                continue;
            }

            if !self.execute_step(grid)? {
                return Err(MissionError::NoPath {
                    from: self.position,
                    to: goal,
                });
            }
        }
        Ok(())
    }

    /// Visits every package and then every destination, in the order they were added.
    pub fn deliver_packages(
        &mut self,
        grid: &mut Grid,
        algorithm: Algorithm,
        config: &PlannerConfig,
    ) -> Result<MissionReport, MissionError> {
        config.validate()?;

        let stops: Vec<_> = self.packages.iter().chain(&self.destinations).copied().collect();
        if let Some(&stop) = stops.iter().find(|&&stop| !grid.in_bounds(stop) || grid.is_wall(stop)) {
            return Err(MissionError::InvalidStop(stop));
        }

        let destinations: Vec<_> = self.destinations.clone();
        for stop in stops {
            info!(%algorithm, from = ?self.position, to = ?stop, fuel = self.fuel, "heading to stop");
            self.travel_to(grid, stop, algorithm, config)?;

            if destinations.contains(&stop) && self.carrying > 0 {
                self.carrying -= 1;
                self.delivered += 1;
                info!(position = ?stop, "delivered package");
            }
        }

        Ok(self.report())
    }

    /// Counters accumulated so far, whether or not the mission finished.
    pub fn report(&self) -> MissionReport {
        MissionReport {
            moves: self.moves,
            fuel_used: self.fuel_used,
            fuel_remaining: self.fuel,
            planning_calls: self.planning_calls,
            expanded: self.expanded,
            delivered: self.delivered,
        }
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            position: self.position,
            fuel: self.fuel,
            packages_remaining: self.packages.len(),
            route_remaining: self.route.len(),
            moves: self.moves,
        }
    }
}
