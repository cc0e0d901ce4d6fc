//! Remaining-cost estimates for [`AStar`](super::a_star::AStar).
//!
//! A heuristic takes the candidate cell and the goal and returns a
//! non-negative estimate of the cost still to pay. A* returns the cheapest
//! route only while the estimate never exceeds the true remaining cost
//! (admissibility). Every cell costs at least [`Terrain::MIN_COST`], so any
//! estimate bounded by the move count times that minimum is admissible.
//! The planner cannot detect an inadmissible heuristic; it simply returns
//! a feasible but possibly more expensive route.

use std::collections::HashMap;

use pathfinding::prelude::dijkstra_all;

use crate::grid::{Grid, Position, Terrain};

/// Signature shared by every heuristic.
pub type Heuristic = dyn Fn(Position, Position) -> u32;

/// Manhattan distance scaled by the cheapest terrain cost. The default.
pub fn manhattan(from: Position, to: Position) -> u32 {
    from.manhattan(&to) as u32 * Terrain::MIN_COST
}

/// Straight-line distance, rounded down. Admissible but weaker than Manhattan.
pub fn euclidean(from: Position, to: Position) -> u32 {
    let dx = from.x.abs_diff(to.x) as f64;
    let dy = from.y.abs_diff(to.y) as f64;
    (dx.hypot(dy).floor() as u32) * Terrain::MIN_COST
}

/// Exact cost to `goal` on the static grid, ignoring moving obstacles.
///
/// Obstacles only ever remove moves, so the static cost never exceeds the
/// time-aware one. The table is built once with a reverse Dijkstra sweep
/// from `goal`; cells it cannot reach, and any other goal, fall back to
/// [`manhattan`].
pub fn static_cost(grid: &Grid, goal: Position) -> impl Fn(Position, Position) -> u32 + 'static {
    let table = if grid.in_bounds(goal) {
        // Stepping backwards from `cell` to `prev` stands for the move prev -> cell.
        dijkstra_all(&goal, |&cell| {
            let entry = grid.cost_of(cell);
            grid.neighbors(cell)
                .filter(|prev| !grid.is_wall(*prev))
                .map(|prev| (prev, entry))
                .collect::<Vec<_>>()
        })
    } else {
        HashMap::new()
    };

    move |from, to| {
        if to != goal || from == goal {
            return manhattan(from, to);
        }
        table
            .get(&from)
            .map_or_else(|| manhattan(from, to), |&(_, cost)| cost)
    }
}

/// No estimate at all; turns A* into uniform-cost search.
pub fn zero(_from: Position, _to: Position) -> u32 {
    0
}
