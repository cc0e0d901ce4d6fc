use crate::algorithms::common::{PathPlanner, Plan, SearchLimits, SearchTree, StateSpace};
use crate::grid::{Grid, Position};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

/// Breadth-first search over (cell, tick) states.
///
/// Finds a route with the fewest moves. Terrain cost is tracked for the
/// returned plan but never consulted when choosing between routes.
pub struct Bfs<'a> {
    grid: &'a Grid,
    limits: SearchLimits,
}

impl<'a> Bfs<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Bfs {
            grid,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl PathPlanner for Bfs<'_> {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn plan(&mut self, start: Position, goal: Position, start_time: usize) -> Option<Plan> {
        let space = StateSpace::new(self.grid, start_time, &self.limits);
        let mut tree = SearchTree::new();
        let mut queue = VecDeque::new();
        let mut visited = FxHashSet::default();
        let mut expanded = 0;

        let root = tree.push_root(start, start_time);
        visited.insert(space.key(start, start_time));
        queue.push_back(root);

        while let Some(id) = queue.pop_front() {
            let node = *tree.get(id);
            if node.pos == goal {
                debug!(?start, ?goal, expanded, moves = node.time_step - start_time, "bfs reached goal");
                return Some(tree.plan_to(id, expanded));
            }

            if expanded >= self.limits.max_expansions {
                debug!(?start, ?goal, expanded, "bfs hit expansion limit");
                return None;
            }
            expanded += 1;

            for successor in space.successors(id, &node) {
                // Marked on enqueue so a state is never queued twice.
                if visited.insert(space.key(successor.pos, successor.time_step)) {
                    queue.push_back(tree.push(successor));
                }
            }
        }

        debug!(?start, ?goal, expanded, "bfs exhausted frontier");
        None
    }
}
