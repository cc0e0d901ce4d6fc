use crate::algorithms::common::{Plan, QueueEntry, SearchLimits, SearchTree, StateSpace};
use crate::grid::Position;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BinaryHeap;
use tracing::debug;

/// Best-first search ordered by `cost + estimate(pos)`, shared by UCS and A*.
///
/// States are closed when popped. A cheaper route to a queued state pushes a
/// fresh entry; the stale one is skipped when it surfaces. Entries with equal
/// priority pop in insertion order.
pub(crate) fn best_first<H>(
    label: &'static str,
    space: &StateSpace<'_>,
    start: Position,
    goal: Position,
    start_time: usize,
    limits: &SearchLimits,
    estimate: H,
) -> Option<Plan>
where
    H: Fn(Position) -> u32,
{
    let mut tree = SearchTree::new();
    let mut open = BinaryHeap::new();
    let mut closed = FxHashSet::default();
    let mut best_cost = FxHashMap::default();
    let mut seq = 0u64;
    let mut expanded = 0;

    let root = tree.push_root(start, start_time);
    best_cost.insert(space.key(start, start_time), 0);
    open.push(QueueEntry {
        priority: estimate(start),
        seq,
        node: root,
    });

    while let Some(entry) = open.pop() {
        let node = *tree.get(entry.node);
        if !closed.insert(space.key(node.pos, node.time_step)) {
            continue;
        }

        if node.pos == goal {
            debug!(planner = label, ?start, ?goal, expanded, cost = node.cost, "reached goal");
            return Some(tree.plan_to(entry.node, expanded));
        }

        if expanded >= limits.max_expansions {
            debug!(planner = label, ?start, ?goal, expanded, "hit expansion limit");
            return None;
        }
        expanded += 1;

        for successor in space.successors(entry.node, &node) {
            let key = space.key(successor.pos, successor.time_step);
            if closed.contains(&key) {
                continue;
            }
            if best_cost.get(&key).is_some_and(|&known| known <= successor.cost) {
                continue;
            }
            best_cost.insert(key, successor.cost);

            seq += 1;
            let priority = successor.cost.saturating_add(estimate(successor.pos));
            open.push(QueueEntry {
                priority,
                seq,
                node: tree.push(successor),
            });
        }
    }

    debug!(planner = label, ?start, ?goal, expanded, "exhausted frontier");
    None
}
