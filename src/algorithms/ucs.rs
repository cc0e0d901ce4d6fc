use crate::algorithms::best_first::best_first;
use crate::algorithms::common::{PathPlanner, Plan, SearchLimits, StateSpace};
use crate::grid::{Grid, Position};

/// Uniform-cost search: the cheapest route by terrain cost.
///
/// Among equally cheap routes the one whose final state was queued first
/// wins, which makes the result reproducible for a given grid.
pub struct Ucs<'a> {
    grid: &'a Grid,
    limits: SearchLimits,
}

impl<'a> Ucs<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Ucs {
            grid,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl PathPlanner for Ucs<'_> {
    fn name(&self) -> &'static str {
        "ucs"
    }

    fn plan(&mut self, start: Position, goal: Position, start_time: usize) -> Option<Plan> {
        let space = StateSpace::new(self.grid, start_time, &self.limits);
        best_first("ucs", &space, start, goal, start_time, &self.limits, |_| 0)
    }
}
