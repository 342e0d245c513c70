//! The state-space search over package-install assignments.
//!
//! Nodes are total assignments over all discovered variables; an edge flips
//! exactly one variable's sign and exists only if the resulting assignment
//! passes the SAT oracle. Installing a package costs its `size`; removing
//! one costs a large fixed penalty, keeping removal a strongly disfavored
//! last resort without ever forbidding it.
//!
//! Two strategies share the encoder and oracle: the canonical cost-guided
//! best-first search and an iterative-deepening depth-first alternative
//! that trades optimality for lower peak memory.

mod best_first;
mod deepening;

use crate::{
    encoding::{Encoder, State},
    error::PlanError,
    goal::Goal,
    oracle::SatOracle,
    planner::Plan,
};

/// The default removal penalty: far above any realistic cumulative install
/// size, never infinite.
pub const DEFAULT_REMOVE_PENALTY: u64 = 1_000_000;

/// Which search strategy drives the plan search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Cost-guided best-first search. Finds the cheapest plan the heuristic
    /// and dominance pruning allow; the canonical choice.
    #[default]
    BestFirst,
    /// Iterative-deepening depth-first search under growing (cost, depth)
    /// budgets. Lower peak memory; returns the first plan found within a
    /// round, not necessarily the cheapest.
    IterativeDeepening,
}

/// Tunables for the plan search.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// The strategy to run.
    pub strategy: Strategy,
    /// Edge cost of removing an installed package.
    pub remove_penalty: u64,
    /// Upper bound on node expansions across the whole search, or `None`
    /// for unbounded. The state space is exponential in the discovered
    /// package count, so long-running deployments should set this.
    pub max_expansions: Option<u64>,
    /// Rebuild the SAT solver every this many oracle queries to reclaim
    /// learnt-clause memory; `0` disables reclamation.
    pub reclaim_interval: u64,
    /// Maximum number of budget-doubling rounds for
    /// [`Strategy::IterativeDeepening`].
    pub max_rounds: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            remove_penalty: DEFAULT_REMOVE_PENALTY,
            max_expansions: None,
            reclaim_interval: 8192,
            max_rounds: 32,
        }
    }
}

/// Runs the configured strategy from the given initial assignment.
pub(crate) fn run(
    encoder: &Encoder<'_>,
    oracle: &mut SatOracle,
    goal: &Goal,
    initial: State,
    config: &SearchConfig,
) -> Result<Plan, PlanError> {
    match config.strategy {
        Strategy::BestFirst => best_first::search(encoder, oracle, goal, initial, config),
        Strategy::IterativeDeepening => {
            deepening::search(encoder, oracle, goal, initial, config)
        }
    }
}
