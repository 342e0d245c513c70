//! The goal predicate derived from the constraint set.

use itertools::Itertools;

use crate::{
    encoding::{Encoder, Literal, State},
    internal::id::VariableId,
};

/// The compiled goal predicate.
///
/// Each alternative is one way of picking exactly one matching variant per
/// positive constraint, concatenated with the shared set of negative
/// literals from the `-` constraints. A state satisfies the goal iff some
/// alternative is fully entailed by it.
pub struct Goal {
    alternatives: Vec<Vec<Literal>>,
}

impl Goal {
    /// Builds the alternative list as the Cartesian product across the
    /// positive constraints' candidate variables.
    ///
    /// Every candidate group must be non-empty; empty groups are rejected as
    /// fatal input errors before the goal is built.
    pub fn new(positive: Vec<Vec<VariableId>>, negative: Vec<VariableId>) -> Self {
        let negative: Vec<Literal> = negative.into_iter().map(Literal::negative).collect();
        let alternatives = if positive.is_empty() {
            vec![negative]
        } else {
            positive
                .iter()
                .map(|group| group.iter().copied())
                .multi_cartesian_product()
                .map(|combination| {
                    combination
                        .into_iter()
                        .map(Literal::positive)
                        .chain(negative.iter().copied())
                        .collect()
                })
                .collect()
        };
        Goal { alternatives }
    }

    /// The number of final-state alternatives.
    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    /// True iff some alternative's literals are all entailed by the state.
    ///
    /// Only meaningful for total assignments, which every [`State`] is by
    /// construction once the model has been frozen.
    pub fn is_satisfied(&self, state: &State) -> bool {
        self.alternatives.iter().any(|alternative| {
            alternative.iter().all(|literal| {
                state.is_installed(literal.variable()) == literal.is_positive()
            })
        })
    }

    /// A lower-bound-flavored estimate of the remaining cost to reach the
    /// goal: the minimum over alternatives of the unmet positive literals'
    /// install sizes plus the removal penalty per violated negative literal.
    ///
    /// Best effort only. Dependency closures can force cost this estimate
    /// does not see, so it is not proven admissible; the search uses it as
    /// a guide, not as an optimality certificate.
    pub fn remaining_cost(
        &self,
        state: &State,
        encoder: &Encoder<'_>,
        remove_penalty: u64,
    ) -> u64 {
        self.alternatives
            .iter()
            .map(|alternative| {
                alternative
                    .iter()
                    .map(|literal| {
                        let installed = state.is_installed(literal.variable());
                        if literal.is_positive() && !installed {
                            encoder.install_cost(literal.variable())
                        } else if !literal.is_positive() && installed {
                            remove_penalty
                        } else {
                            0
                        }
                    })
                    .sum::<u64>()
            })
            .min()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(index: usize) -> VariableId {
        VariableId::from_usize(index)
    }

    fn accepted(goal: &Goal, variable_count: usize) -> Vec<State> {
        // Enumerate all assignments over a small variable universe.
        (0u32..1 << variable_count)
            .map(|bits| {
                State::new(
                    variable_count,
                    (0..variable_count).filter(|&i| bits & (1 << i) != 0).map(var),
                )
            })
            .filter(|state| goal.is_satisfied(state))
            .collect()
    }

    #[test]
    fn cartesian_product_of_positive_groups() {
        let goal = Goal::new(vec![vec![var(0), var(1)], vec![var(2)]], vec![]);
        assert_eq!(goal.alternative_count(), 2);
        assert!(goal.is_satisfied(&State::new(3, [var(0), var(2)])));
        assert!(goal.is_satisfied(&State::new(3, [var(1), var(2)])));
        assert!(!goal.is_satisfied(&State::new(3, [var(0), var(1)])));
    }

    #[test]
    fn negatives_apply_to_every_alternative() {
        let goal = Goal::new(vec![vec![var(0), var(1)]], vec![var(2)]);
        assert!(goal.is_satisfied(&State::new(3, [var(0)])));
        assert!(!goal.is_satisfied(&State::new(3, [var(0), var(2)])));
        assert!(!goal.is_satisfied(&State::new(3, [var(1), var(2)])));
    }

    #[test]
    fn no_positive_constraints_still_enforce_negatives() {
        let goal = Goal::new(vec![], vec![var(1)]);
        assert_eq!(goal.alternative_count(), 1);
        assert!(goal.is_satisfied(&State::new(2, [var(0)])));
        assert!(!goal.is_satisfied(&State::new(2, [var(1)])));
    }

    #[test]
    fn adding_constraints_narrows_acceptance() {
        let loose = Goal::new(vec![vec![var(0), var(1)]], vec![]);
        let more_positive = Goal::new(vec![vec![var(0), var(1)], vec![var(2)]], vec![]);
        let more_negative = Goal::new(vec![vec![var(0), var(1)]], vec![var(3)]);

        let base = accepted(&loose, 4);
        for state in accepted(&more_positive, 4) {
            assert!(base.contains(&state));
        }
        for state in accepted(&more_negative, 4) {
            assert!(base.contains(&state));
        }
        assert!(accepted(&more_positive, 4).len() < base.len());
        assert!(accepted(&more_negative, 4).len() < base.len());
    }
}
