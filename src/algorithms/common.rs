use crate::error::ConfigError;
use crate::grid::{Direction, Grid, Position};
use std::cmp::Ordering;

/// Something that can route the agent from one cell to another.
///
/// `start_time` is the tick, relative to the world's current obstacle state,
/// at which the agent stands on `start`. `None` means the goal could not be
/// reached within the planner's limits; it is a normal outcome.
pub trait PathPlanner {
    fn name(&self) -> &'static str;

    fn plan(&mut self, start: Position, goal: Position, start_time: usize) -> Option<Plan>;
}

/// A complete route from start to goal, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub path: Vec<Position>,
    /// Sum of the terrain costs of every entered cell; the start is free.
    pub cost: u32,
    pub start_time: usize,
    /// States whose successors were generated while searching.
    pub expanded: usize,
}

impl Plan {
    pub fn moves(&self) -> usize {
        self.path.len() - 1
    }

    pub fn goal(&self) -> Position {
        self.path[self.path.len() - 1]
    }

    pub fn arrival_time(&self) -> usize {
        self.start_time + self.moves()
    }
}

/// Ceilings that keep the time-expanded search finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Longest route, in moves, that a search will consider.
    pub max_steps: usize,
    /// Expanded states after which a search gives up.
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_steps: 10_000,
            max_expansions: 2_000_000,
        }
    }
}

impl SearchLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroSearchLimit("max_steps"));
        }
        if self.max_expansions == 0 {
            return Err(ConfigError::ZeroSearchLimit("max_expansions"));
        }
        Ok(())
    }
}

pub type NodeId = usize;

/// A search state: a cell occupied at a given tick.
///
/// Two nodes denote the same state when position and tick agree; cost and
/// parent only describe how the state was reached.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub pos: Position,
    pub cost: u32,
    pub time_step: usize,
    pub parent: Option<NodeId>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.time_step == other.time_step
    }
}

impl Eq for Node {}

/// Append-only arena holding every node a search creates.
#[derive(Debug, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    pub fn new() -> Self {
        SearchTree::default()
    }

    pub fn push_root(&mut self, pos: Position, time_step: usize) -> NodeId {
        self.push(Node {
            pos,
            cost: 0,
            time_step,
            parent: None,
        })
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks parent links from `id` back to the root and returns the route in travel order.
    pub fn path_to(&self, id: NodeId) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            path.push(node.pos);
            current = node.parent;
        }
        path.reverse();
        path
    }

    pub fn plan_to(&self, id: NodeId, expanded: usize) -> Plan {
        let path = self.path_to(id);
        let node = &self.nodes[id];
        Plan {
            cost: node.cost,
            start_time: node.time_step - (path.len() - 1),
            path,
            expanded,
        }
    }

    /// Rebuilds a node chain for an explicit route, pricing each entered cell.
    pub fn from_path(grid: &Grid, path: &[Position], start_time: usize) -> Option<(SearchTree, NodeId)> {
        let (&start, rest) = path.split_first()?;
        let mut tree = SearchTree::new();
        let mut last = tree.push_root(start, start_time);
        for &pos in rest {
            let parent = *tree.get(last);
            last = tree.push(Node {
                pos,
                cost: parent.cost + grid.cost_of(pos),
                time_step: parent.time_step + 1,
                parent: Some(last),
            });
        }
        Some((tree, last))
    }
}

/// Key under which a state is marked as visited.
///
/// When every moving obstacle is periodic, two states at the same cell whose
/// ticks are congruent modulo the world's period have identical futures, so
/// the tick is folded into that period. Otherwise the absolute tick is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub pos: Position,
    pub phase: usize,
}

/// Time-expanded view of a [`Grid`] shared by the exhaustive planners.
pub struct StateSpace<'a> {
    grid: &'a Grid,
    period: Option<usize>,
    horizon: usize,
}

impl<'a> StateSpace<'a> {
    pub fn new(grid: &'a Grid, start_time: usize, limits: &SearchLimits) -> Self {
        StateSpace {
            grid,
            period: grid.obstacle_period(),
            horizon: start_time.saturating_add(limits.max_steps),
        }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn key(&self, pos: Position, time_step: usize) -> StateKey {
        let phase = match self.period {
            Some(period) => time_step % period,
            None => time_step,
        };
        StateKey { pos, phase }
    }

    /// Successor nodes of `node`, one per enterable orthogonal neighbour.
    pub fn successors(&self, id: NodeId, node: &Node) -> impl Iterator<Item = Node> + '_ {
        let time_step = node.time_step + 1;
        let within_horizon = time_step <= self.horizon;
        let (pos, cost) = (node.pos, node.cost);

        Direction::ALL
            .into_iter()
            .filter(move |_| within_horizon)
            .filter_map(move |direction| pos.step(direction))
            .filter(move |next| self.grid.is_enterable(*next, time_step))
            .map(move |next| Node {
                pos: next,
                cost: cost + self.grid.cost_of(next),
                time_step,
                parent: Some(id),
            })
    }
}

/// Heap entry ordered as a min-heap on `(priority, seq)`.
///
/// `seq` is the insertion counter, so equal priorities pop in the order
/// they were pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub priority: u32,
    pub seq: u64,
    pub node: NodeId,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed comparison to make BinaryHeap a min-heap
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Checks that `path` is a connected route whose every non-start cell is
/// enterable at its tick. Returns its cost when it is.
pub fn route_cost(grid: &Grid, path: &[Position], start_time: usize) -> Option<u32> {
    let mut cost = 0;
    for (i, pair) in path.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        if prev.manhattan(&next) != 1 || !grid.is_enterable(next, start_time + i + 1) {
            return None;
        }
        cost += grid.cost_of(next);
    }
    Some(cost)
}
