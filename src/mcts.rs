//! Monte Carlo Tree Search (MCTS) with UCT selection.
//!
//! Each move request builds a fresh tree rooted at the current position.
//! One iteration runs four phases:
//! - **selection**: descend by UCT until an unvisited or terminal node;
//! - **expansion**: give a non-terminal leaf one child per legal column and
//!   step into a uniformly random one;
//! - **rollout**: play the position out with the [`playout`](crate::playout)
//!   policy;
//! - **backpropagation**: every node on the path gets one visit and a reward
//!   of +1/-1/0 from the point of view of the player who moved *into* it.
//!
//! The final move is the most visited root child (the "robust child").
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]; the tree owns
//! no boards, positions are replayed from the root on every descent.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::agent::Agent;
use crate::board::{Board, Player};
use crate::constants::{EXPLORATION, N_SIMS, NAME_MCTS};
use crate::error::{GameError, Result};
use crate::playout::rollout;

// =============================================================================
// Search tree
// =============================================================================

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    /// Column that led here from the parent; `None` at the root.
    mv: Option<usize>,
    /// Player to move in this node.
    to_play: Player,
    /// (column, child) pairs in expansion order.
    children: Vec<(usize, NodeId)>,
    visits: u32,
    /// Sum of rewards from the point of view of the parent's mover.
    reward: f64,
}

impl Node {
    fn new(parent: Option<NodeId>, mv: Option<usize>, to_play: Player) -> Self {
        Self {
            parent,
            mv,
            to_play,
            children: Vec::new(),
            visits: 0,
            reward: 0.0,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn mv(&self) -> Option<usize> {
        self.mv
    }

    pub fn to_play(&self) -> Player {
        self.to_play
    }

    pub fn children(&self) -> &[(usize, NodeId)] {
        &self.children
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Mean reward, 0 for an unvisited node.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits > 0 {
            self.reward / self.visits as f64
        } else {
            0.0
        }
    }
}

/// UCT score `Q + c * sqrt(ln(N_parent) / N)`; unvisited children score
/// infinity so they are tried first.
#[inline]
pub fn uct_value(reward: f64, visits: u32, parent_visits: u32, c: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let n = visits as f64;
    let exploration = if parent_visits > 0 {
        c * ((parent_visits as f64).ln() / n).sqrt()
    } else {
        0.0
    };
    reward / n + exploration
}

/// Arena-backed search tree. The root is always the first node.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    /// A tree holding only a root with `to_play` to move.
    pub fn new(to_play: Player) -> Self {
        Self {
            nodes: vec![Node::new(None, None, to_play)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// UCT score of `id` under its parent.
    pub fn uct(&self, id: NodeId, c: f64) -> f64 {
        let node = self.get(id);
        let parent_visits = node.parent.map_or(0, |p| self.get(p).visits);
        uct_value(node.reward, node.visits, parent_visits, c)
    }

    /// Child with the highest UCT score; the earliest child wins ties.
    pub fn select_child(&self, id: NodeId, c: f64) -> Option<(usize, NodeId)> {
        let mut best: Option<((usize, NodeId), f64)> = None;
        for &(col, child) in &self.get(id).children {
            let score = self.uct(child, c);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some(((col, child), score));
            }
        }
        best.map(|(entry, _)| entry)
    }

    /// Add one child per legal column of `state` to `id`.
    ///
    /// Does nothing for a terminal `state` or an already expanded node.
    pub fn expand(&mut self, id: NodeId, state: &Board) {
        if state.is_terminal() || !self.get(id).children.is_empty() {
            return;
        }
        let to_play = self.get(id).to_play.opponent();
        for col in state.legal_columns() {
            let child = NodeId(self.nodes.len() as u32);
            self.nodes.push(Node::new(Some(id), Some(col), to_play));
            self.get_mut(id).children.push((col, child));
        }
    }

    /// Walk from `leaf` to the root, adding one visit and the reward for
    /// `outcome` (`None` is a draw) to every node.
    pub fn backpropagate(&mut self, leaf: NodeId, outcome: Option<Player>) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            node.reward += match outcome {
                None => 0.0,
                Some(p) if p == node.to_play.opponent() => 1.0,
                Some(_) => -1.0,
            };
            current = node.parent;
        }
    }

    /// Root children as (column, node) pairs in expansion order.
    pub fn root_children(&self) -> impl Iterator<Item = (usize, &Node)> + '_ {
        self.get(self.root())
            .children
            .iter()
            .map(|&(col, id)| (col, self.get(id)))
    }

    /// Most visited root child; the earliest child wins ties.
    pub fn best_move(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (col, node) in self.root_children() {
            if best.is_none_or(|(_, top)| node.visits > top) {
                best = Some((col, node.visits));
            }
        }
        best.map(|(col, _)| col)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// How long a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBudget {
    /// Fixed number of iterations.
    Simulations(u32),
    /// Iterate until the wall-clock limit passes; checked between iterations.
    TimeLimit(Duration),
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    pub budget: SearchBudget,

    /// Exploration constant `c` of the UCT formula.
    pub exploration: f64,

    /// Rollouts reaching this many plies count as draws. `None` plays to the end.
    pub rollout_max_len: Option<usize>,

    /// Bias rollout moves toward the central columns.
    pub center_bias: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::Simulations(N_SIMS),
            exploration: EXPLORATION,
            rollout_max_len: None,
            center_bias: true,
        }
    }
}

impl MctsConfig {
    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.budget = SearchBudget::Simulations(simulations);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.budget = SearchBudget::TimeLimit(limit);
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_rollout_max_len(mut self, max_len: Option<usize>) -> Self {
        self.rollout_max_len = max_len;
        self
    }

    pub fn with_center_bias(mut self, on: bool) -> Self {
        self.center_bias = on;
        self
    }
}

// =============================================================================
// Agent
// =============================================================================

/// UCT agent with its own random generator.
pub struct MctsAgent {
    name: String,
    config: MctsConfig,
    rng: fastrand::Rng,
}

impl Default for MctsAgent {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            name: NAME_MCTS.to_string(),
            config,
            rng: fastrand::Rng::new(),
        }
    }

    /// Reproducible agent (for a simulation budget).
    pub fn with_seed(config: MctsConfig, seed: u64) -> Self {
        Self {
            name: NAME_MCTS.to_string(),
            config,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Build a search tree for `player` to move on `board`.
    pub fn search(&mut self, board: &Board, player: Player) -> Result<SearchTree> {
        let mut tree = SearchTree::new(player);
        let mut iterations = 0u64;

        match self.config.budget {
            SearchBudget::Simulations(n) => {
                for _ in 0..n {
                    self.iterate(&mut tree, board)?;
                }
                iterations = n as u64;
            }
            SearchBudget::TimeLimit(limit) => {
                let deadline = Instant::now() + limit;
                while Instant::now() < deadline {
                    self.iterate(&mut tree, board)?;
                    iterations += 1;
                }
            }
        }

        debug!(iterations, nodes = tree.len(), "mcts search finished");
        Ok(tree)
    }

    /// One selection, expansion, rollout and backpropagation pass.
    fn iterate(&mut self, tree: &mut SearchTree, root_state: &Board) -> Result<()> {
        let c = self.config.exploration;
        let mut state = root_state.clone();
        let mut node = tree.root();

        // Selection
        while let Some((col, child)) = tree.select_child(node, c) {
            state.play(col, tree.get(node).to_play)?;
            node = child;
            if tree.get(node).visits == 0 || state.is_terminal() {
                break;
            }
        }

        // Expansion
        if !state.is_terminal() {
            tree.expand(node, &state);
            let children = tree.get(node).children();
            if !children.is_empty() {
                let (col, child) = children[self.rng.usize(..children.len())];
                state.play(col, tree.get(node).to_play)?;
                node = child;
            }
        }

        // Rollout
        let to_play = tree.get(node).to_play;
        let outcome = rollout(
            &mut state,
            to_play,
            &mut self.rng,
            self.config.center_bias,
            self.config.rollout_max_len,
        )?;

        // Backpropagation
        tree.backpropagate(node, outcome);
        Ok(())
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        let legal = board.legal_columns();
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves);
        }

        let tree = self.search(board, player)?;
        for (col, child) in tree.root_children() {
            trace!(col, visits = child.visits, mean = child.mean(), "root child");
        }

        match tree.best_move() {
            Some(col) => Ok(col),
            None => self
                .rng
                .choice(legal.iter().copied())
                .ok_or(GameError::NoLegalMoves),
        }
    }
}
