//! Cost-guided best-first search.

use std::{cmp::Ordering, collections::BinaryHeap};

use ahash::HashMap;

use crate::{
    encoding::{Encoder, State},
    error::PlanError,
    goal::Goal,
    internal::id::VariableId,
    oracle::SatOracle,
    planner::{Action, Plan},
    search::SearchConfig,
};

struct Node {
    /// Estimated total cost `g + h`.
    f: u64,
    /// Cost of the best known path to this state.
    g: u64,
    /// Insertion counter, the final tie-breaker.
    seq: u64,
    state: State,
    actions: Vec<Action>,
}

impl Ord for Node {
    /// Frontier order: ascending `f`, then deeper paths first (keeping the
    /// search depth-first-ish among ties), then insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then_with(|| other.actions.len().cmp(&self.actions.len()))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

pub(super) fn search(
    encoder: &Encoder<'_>,
    oracle: &mut SatOracle,
    goal: &Goal,
    initial: State,
    config: &SearchConfig,
) -> Result<Plan, PlanError> {
    let mut best_cost: HashMap<State, u64> = HashMap::default();
    best_cost.insert(initial.clone(), 0);

    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;
    frontier.push(std::cmp::Reverse(Node {
        f: goal.remaining_cost(&initial, encoder, config.remove_penalty),
        g: 0,
        seq,
        state: initial,
        actions: Vec::new(),
    }));

    let mut expansions = 0u64;
    while let Some(std::cmp::Reverse(node)) = frontier.pop() {
        // A cheaper path to this state was found after this entry was
        // enqueued; the entry is stale.
        if best_cost.get(&node.state).is_some_and(|&cost| cost < node.g) {
            continue;
        }

        if goal.is_satisfied(&node.state) {
            tracing::info!(
                cost = node.g,
                actions = node.actions.len(),
                expansions,
                queries = oracle.queries(),
                "plan found"
            );
            return Ok(Plan {
                actions: node.actions,
                cost: node.g,
            });
        }

        expansions += 1;
        if config.max_expansions.is_some_and(|cap| expansions > cap) {
            return Err(PlanError::BudgetExhausted);
        }
        if expansions % 1024 == 0 {
            tracing::debug!(
                expansions,
                frontier = frontier.len(),
                visited = best_cost.len(),
                "search progress"
            );
        }

        for index in 0..encoder.variable_count() {
            let variable = VariableId::from_usize(index);
            let next = node.state.toggled(variable);
            let installing = next.is_installed(variable);
            let edge = if installing {
                encoder.install_cost(variable)
            } else {
                config.remove_penalty
            };
            let g = node.g + edge;

            // Dominance pruning: re-deriving a visited state at equal or
            // higher cost never re-enqueues it.
            if best_cost.get(&next).is_some_and(|&cost| cost <= g) {
                continue;
            }
            if !oracle.valid(&next) {
                continue;
            }

            best_cost.insert(next.clone(), g);
            seq += 1;
            let mut actions = node.actions.clone();
            actions.push(Action {
                install: installing,
                package: encoder.package(variable),
            });
            frontier.push(std::cmp::Reverse(Node {
                f: g + goal.remaining_cost(&next, encoder, config.remove_penalty),
                g,
                seq,
                state: next,
                actions,
            }));
        }
    }

    tracing::info!(expansions, "frontier exhausted without reaching the goal");
    Err(PlanError::NoPlanFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        internal::id::PackageId,
        repository::{PackageRecord, Repository},
    };

    fn package(name: &str, size: u64, depends: &[&[&str]]) -> PackageRecord {
        PackageRecord {
            name: name.to_owned(),
            version: "1.0".to_owned(),
            size,
            depends: depends
                .iter()
                .map(|group| group.iter().map(|s| s.to_string()).collect())
                .collect(),
            conflicts: Vec::new(),
        }
    }

    #[test]
    fn equal_cost_rederivations_are_not_requeried() {
        // Diamond: `a` needs both `b` and `c`, so the two install orders
        // meet in the same intermediate state.
        let repo = Repository::from_records([
            package("a", 1, &[&["b"], &["c"]]),
            package("b", 5, &[]),
            package("c", 5, &[]),
        ]);
        let mut encoder = Encoder::new(&repo);
        let a = encoder.discover(PackageId(0));
        let goal = Goal::new(vec![vec![a]], vec![]);
        let config = SearchConfig::default();
        let mut oracle = SatOracle::new(&encoder, config.reclaim_interval);
        let initial = State::new(encoder.variable_count(), []);

        let plan = search(&encoder, &mut oracle, &goal, initial, &config).unwrap();

        assert_eq!(plan.cost, 11);
        // Seven states are reachable besides the empty one. Each passes
        // through the oracle exactly once: re-deriving the shared state at
        // equal cost is rejected before the validity query.
        assert_eq!(oracle.queries(), 7);
    }
}
