//! Per-run search state: the node arena, the frontier (open set) and the visited (closed) set.
//!
//! Nodes never hold references to each other. Every node created during a run lives in the arena
//! owned by [SearchState] and predecessors are [NodeId] indices into it, so the predecessor chain
//! stays valid for as long as the state is alive.
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::iter;

use crate::error::{Result, SearchError};
use crate::node::{Node, NodeId};
use crate::pathing_grid::{Cell, PathingGrid};
use crate::solver::{StepOutcome, Strategy};
use crate::SearchStatus;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

struct SmallestCostHolder {
    estimated_cost: i32,
    order: u64,
    pos: Point,
    index: NodeId,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost && self.order == other.order
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first; ties go to whichever entry was pushed first
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.order.cmp(&self.order),
            s => s,
        }
    }
}

/// How a [Frontier] picks the next node to expand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontierOrder {
    /// Most recently pushed first (stack).
    Lifo,
    /// Earliest pushed first (queue).
    Fifo,
    /// Lowest priority value first, earliest pushed among equals.
    Priority,
}

enum FrontierQueue {
    Stack(Vec<(Point, NodeId)>),
    Queue(VecDeque<(Point, NodeId)>),
    Heap(BinaryHeap<SmallestCostHolder>),
}

/// The open set. Holds at most one live node per position; pushing a node for a position that is
/// already queued replaces the old node, whose queue entry is then skipped when it surfaces.
pub struct Frontier {
    queue: FrontierQueue,
    members: FxIndexMap<Point, NodeId>,
    pushed: u64,
}

impl Frontier {
    pub fn new(order: FrontierOrder) -> Frontier {
        let queue = match order {
            FrontierOrder::Lifo => FrontierQueue::Stack(Vec::new()),
            FrontierOrder::Fifo => FrontierQueue::Queue(VecDeque::new()),
            FrontierOrder::Priority => FrontierQueue::Heap(BinaryHeap::new()),
        };
        Frontier {
            queue,
            members: FxIndexMap::default(),
            pushed: 0,
        }
    }

    pub fn order(&self) -> FrontierOrder {
        match self.queue {
            FrontierQueue::Stack(_) => FrontierOrder::Lifo,
            FrontierQueue::Queue(_) => FrontierOrder::Fifo,
            FrontierQueue::Heap(_) => FrontierOrder::Priority,
        }
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn contains(&self, pos: &Point) -> bool {
        self.members.contains_key(pos)
    }
    pub fn get(&self, pos: &Point) -> Option<NodeId> {
        self.members.get(pos).copied()
    }
    pub fn positions(&self) -> impl Iterator<Item = &Point> {
        self.members.keys()
    }

    fn push(&mut self, pos: Point, index: NodeId, priority: i32) {
        self.members.insert(pos, index);
        match &mut self.queue {
            FrontierQueue::Stack(stack) => stack.push((pos, index)),
            FrontierQueue::Queue(queue) => queue.push_back((pos, index)),
            FrontierQueue::Heap(heap) => heap.push(SmallestCostHolder {
                estimated_cost: priority,
                order: self.pushed,
                pos,
                index,
            }),
        }
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<NodeId> {
        loop {
            let (pos, index) = match &mut self.queue {
                FrontierQueue::Stack(stack) => stack.pop()?,
                FrontierQueue::Queue(queue) => queue.pop_front()?,
                FrontierQueue::Heap(heap) => heap.pop().map(|h| (h.pos, h.index))?,
            };
            // Entries for replaced nodes stay queued until they surface here
            if self.members.get(&pos) == Some(&index) {
                self.members.swap_remove(&pos);
                return Some(index);
            }
        }
    }
}

/// Everything a single search run owns. Created by [SearchState::new] when a search starts,
/// advanced one expansion at a time by [SearchState::step] and dropped when the next search starts
/// or the grid is cleared.
pub struct SearchState {
    strategy: Strategy,
    start: Point,
    end: Point,
    allow_diagonal_move: bool,
    arena: Vec<Node>,
    frontier: Frontier,
    visited: FxIndexMap<Point, NodeId>,
    steps: usize,
    outcome: Option<StepOutcome>,
    goal: Option<NodeId>,
    relaxations: usize,
}

impl SearchState {
    /// Starts a run from the grid's start marker towards its end marker using the grid's current
    /// connectivity.
    pub fn new(strategy: Strategy, grid: &PathingGrid) -> SearchState {
        SearchState::with_endpoints(
            strategy,
            grid.start(),
            grid.end(),
            grid.allow_diagonal_move(),
        )
    }

    pub fn with_endpoints(
        strategy: Strategy,
        start: Point,
        end: Point,
        allow_diagonal_move: bool,
    ) -> SearchState {
        let solver = strategy.solver();
        let mut state = SearchState {
            strategy,
            start,
            end,
            allow_diagonal_move,
            arena: Vec::new(),
            frontier: Frontier::new(solver.frontier_order()),
            visited: FxIndexMap::default(),
            steps: 0,
            outcome: None,
            goal: None,
            relaxations: 0,
        };
        let root = Node::root(start, solver.h_cost(&start, &end, allow_diagonal_move));
        state.enqueue(root);
        info!("Starting {} search from {} to {}", strategy, start, end);
        state
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn end(&self) -> Point {
        self.end
    }
    pub fn allow_diagonal_move(&self) -> bool {
        self.allow_diagonal_move
    }
    pub fn status(&self) -> SearchStatus {
        match self.outcome {
            None => SearchStatus::Running,
            Some(StepOutcome::Found) => SearchStatus::Succeeded,
            Some(_) => SearchStatus::Failed,
        }
    }
    /// Number of [step](Self::step) calls that did work, including the final one.
    pub fn steps(&self) -> usize {
        self.steps
    }
    /// Number of frontier nodes that were replaced by a cheaper node for the same position.
    pub fn relaxations(&self) -> usize {
        self.relaxations
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }
    /// Every node created during the run, including replaced frontier nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.arena
    }
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
    pub fn frontier_node(&self, pos: &Point) -> Option<&Node> {
        self.frontier.get(pos).map(|id| self.node(id))
    }
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
    pub fn is_visited(&self, pos: &Point) -> bool {
        self.visited.contains_key(pos)
    }
    /// Expanded nodes in expansion order.
    pub fn visited(&self) -> impl Iterator<Item = &Node> {
        self.visited.values().map(|id| self.node(*id))
    }
    pub fn goal(&self) -> Option<&Node> {
        self.goal.map(|id| self.node(id))
    }

    /// Performs one expansion. Once the run has produced [Found](StepOutcome::Found) or
    /// [Exhausted](StepOutcome::Exhausted) further calls return that outcome without doing
    /// anything.
    pub fn step(&mut self, grid: &mut PathingGrid) -> StepOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        self.steps += 1;
        let outcome = self.strategy.solver().step(grid, self);
        match outcome {
            StepOutcome::Found => {
                self.goal = self.visited.last().map(|(_, id)| *id);
                self.outcome = Some(outcome);
                info!(
                    "{} search reached {} after {} expansions",
                    self.strategy,
                    self.end,
                    self.visited.len()
                );
            }
            StepOutcome::Exhausted => {
                self.outcome = Some(outcome);
                info!(
                    "{} search exhausted the frontier after {} expansions, {} is unreachable",
                    self.strategy,
                    self.visited.len(),
                    self.end
                );
            }
            StepOutcome::Continue => {}
        }
        outcome
    }

    /// Walks the predecessor chain from the goal back to the start, marking every cell between
    /// them as [PathMark](Cell::PathMark). Returns the number of nodes on the path, counting both
    /// the start and the goal.
    pub fn reconstruct_path(&self, grid: &mut PathingGrid) -> Result<usize> {
        let goal = self.goal.ok_or(SearchError::InvalidState {
            operation: "reconstruct path",
            status: self.status(),
        })?;
        let mut length = 0;
        for id in self.chain(goal) {
            let node = self.node(id);
            if id != goal && node.predecessor.is_some() {
                grid.mark(node.pos, Cell::PathMark);
            }
            length += 1;
        }
        debug!("Reconstructed path of length {}", length);
        Ok(length)
    }

    /// Positions from the start to the goal, if the goal has been found.
    pub fn path(&self) -> Option<Vec<Point>> {
        let goal = self.goal?;
        let mut path: Vec<Point> = self.chain(goal).map(|id| self.node(id).pos).collect();
        path.reverse();
        Some(path)
    }

    fn chain(&self, from: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(from), move |id| self.node(*id).predecessor)
    }

    fn enqueue(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.arena.len());
        let priority = self.strategy.solver().priority(&node);
        let pos = node.pos;
        self.arena.push(node);
        self.frontier.push(pos, id, priority);
        id
    }

    /// Queues a newly discovered node and marks its cell as part of the frontier.
    pub(crate) fn push_frontier(&mut self, grid: &mut PathingGrid, node: Node) -> NodeId {
        let pos = node.pos;
        let id = self.enqueue(node);
        grid.mark(pos, Cell::Frontier);
        id
    }

    /// Replaces the queued node for the same position.
    pub(crate) fn replace_frontier(&mut self, node: Node) -> NodeId {
        debug_assert!(self.frontier.contains(&node.pos));
        self.relaxations += 1;
        self.enqueue(node)
    }

    pub(crate) fn pop_frontier(&mut self) -> Option<NodeId> {
        self.frontier.pop()
    }

    pub(crate) fn close(&mut self, id: NodeId) {
        let pos = self.node(id).pos;
        debug!("Expanding {} (g = {})", pos, self.node(id).g_cost);
        self.visited.insert(pos, id);
    }
}
