use crate::algorithms::best_first::best_first;
use crate::algorithms::common::{PathPlanner, Plan, SearchLimits, StateSpace};
use crate::algorithms::heuristics::{self, Heuristic};
use crate::grid::{Grid, Position};

/// A* search over (cell, tick) states.
///
/// Uses the same queue discipline as [`Ucs`](super::ucs::Ucs) with each
/// entry prioritised by accumulated cost plus the heuristic's estimate.
/// With the default Manhattan heuristic the returned route is as cheap as
/// the one uniform-cost search finds. See [`heuristics`] for the contract a
/// custom heuristic must honour.
pub struct AStar<'a> {
    grid: &'a Grid,
    limits: SearchLimits,
    heuristic: Box<Heuristic>,
}

impl<'a> AStar<'a> {
    /// Creates an A* planner using the Manhattan heuristic.
    pub fn new(grid: &'a Grid) -> Self {
        AStar {
            grid,
            limits: SearchLimits::default(),
            heuristic: Box::new(heuristics::manhattan),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replaces the heuristic. It must not overestimate for the result to stay optimal.
    pub fn with_heuristic<F>(mut self, heuristic: F) -> Self
    where
        F: Fn(Position, Position) -> u32 + 'static,
    {
        self.heuristic = Box::new(heuristic);
        self
    }
}

impl PathPlanner for AStar<'_> {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn plan(&mut self, start: Position, goal: Position, start_time: usize) -> Option<Plan> {
        let space = StateSpace::new(self.grid, start_time, &self.limits);
        let heuristic = &self.heuristic;
        best_first("a_star", &space, start, goal, start_time, &self.limits, |pos| {
            heuristic(pos, goal)
        })
    }
}
