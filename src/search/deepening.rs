//! Iterative-deepening depth-first search.
//!
//! Each round runs a depth-first excursion under a combined (cost, depth)
//! budget, doubling both budgets between rounds. Within a round the search
//! returns the first plan it reaches, trying cheaper transitions first, so
//! the result is a valid plan but not necessarily the cheapest one. Cycling
//! inside one excursion is prevented by a path-scoped visited set; states
//! may be revisited across sibling branches.

use ahash::HashSet;

use crate::{
    encoding::{Encoder, State},
    error::PlanError,
    goal::Goal,
    internal::id::VariableId,
    oracle::SatOracle,
    planner::{Action, Plan},
    search::SearchConfig,
};

/// One explicit stack frame, replacing recursion so repository size never
/// threatens the call stack.
struct Frame {
    state: State,
    g: u64,
    /// Candidate flips ordered cheapest-first.
    transitions: Vec<(VariableId, u64)>,
    next: usize,
}

impl Frame {
    fn new(state: State, g: u64, encoder: &Encoder<'_>, config: &SearchConfig) -> Self {
        let mut transitions: Vec<(VariableId, u64)> = (0..encoder.variable_count())
            .map(|index| {
                let variable = VariableId::from_usize(index);
                let edge = if state.is_installed(variable) {
                    config.remove_penalty
                } else {
                    encoder.install_cost(variable)
                };
                (variable, edge)
            })
            .collect();
        transitions.sort_by_key(|&(_, edge)| edge);
        Frame {
            state,
            g,
            transitions,
            next: 0,
        }
    }
}

enum RoundOutcome {
    Found(Plan),
    /// The round ended; `clipped` records whether any branch was cut off by
    /// the budget. An unclipped exhausted round proves no plan exists.
    Exhausted { clipped: bool },
}

pub(super) fn search(
    encoder: &Encoder<'_>,
    oracle: &mut SatOracle,
    goal: &Goal,
    initial: State,
    config: &SearchConfig,
) -> Result<Plan, PlanError> {
    if goal.is_satisfied(&initial) {
        return Ok(Plan {
            actions: Vec::new(),
            cost: 0,
        });
    }

    let mut cost_budget = goal
        .remaining_cost(&initial, encoder, config.remove_penalty)
        .max(1);
    let mut depth_budget = encoder.variable_count().max(1);
    let mut expansions = 0u64;

    for round in 0..config.max_rounds {
        tracing::debug!(round, cost_budget, depth_budget, "starting deepening round");
        match run_round(
            encoder,
            oracle,
            goal,
            initial.clone(),
            config,
            cost_budget,
            depth_budget,
            &mut expansions,
        )? {
            RoundOutcome::Found(plan) => {
                tracing::info!(
                    round,
                    cost = plan.cost,
                    actions = plan.actions.len(),
                    expansions,
                    "plan found"
                );
                return Ok(plan);
            }
            RoundOutcome::Exhausted { clipped: false } => {
                tracing::info!(round, expansions, "search space exhausted, no plan exists");
                return Err(PlanError::NoPlanFound);
            }
            RoundOutcome::Exhausted { clipped: true } => {
                cost_budget = cost_budget.saturating_mul(2);
                depth_budget = depth_budget.saturating_mul(2);
            }
        }
    }

    Err(PlanError::BudgetExhausted)
}

#[allow(clippy::too_many_arguments)]
fn run_round(
    encoder: &Encoder<'_>,
    oracle: &mut SatOracle,
    goal: &Goal,
    initial: State,
    config: &SearchConfig,
    cost_budget: u64,
    depth_budget: usize,
    expansions: &mut u64,
) -> Result<RoundOutcome, PlanError> {
    let mut clipped = false;
    let mut on_path: HashSet<State> = HashSet::default();
    on_path.insert(initial.clone());
    let mut actions: Vec<Action> = Vec::new();
    let mut stack = vec![Frame::new(initial, 0, encoder, config)];

    enum Step {
        Pop,
        Push { variable: VariableId, g: u64, next: State },
    }

    while !stack.is_empty() {
        let step = {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else { break };

            if depth > depth_budget {
                // Children of this node are unreachable this round.
                if frame.next < frame.transitions.len() {
                    clipped = true;
                }
                Step::Pop
            } else {
                let mut chosen = None;
                while frame.next < frame.transitions.len() {
                    let (variable, edge) = frame.transitions[frame.next];
                    frame.next += 1;

                    let g = frame.g + edge;
                    if g > cost_budget {
                        // Transitions are sorted by edge cost, so everything
                        // after this one is over budget as well.
                        clipped = true;
                        frame.next = frame.transitions.len();
                        break;
                    }
                    let next = frame.state.toggled(variable);
                    if on_path.contains(&next) {
                        continue;
                    }
                    if !oracle.valid(&next) {
                        continue;
                    }
                    chosen = Some((variable, g, next));
                    break;
                }
                match chosen {
                    Some((variable, g, next)) => Step::Push { variable, g, next },
                    None => Step::Pop,
                }
            }
        };

        match step {
            Step::Pop => {
                if let Some(frame) = stack.pop() {
                    on_path.remove(&frame.state);
                }
                actions.pop();
            }
            Step::Push { variable, g, next } => {
                *expansions += 1;
                if config.max_expansions.is_some_and(|cap| *expansions > cap) {
                    return Err(PlanError::BudgetExhausted);
                }

                actions.push(Action {
                    install: next.is_installed(variable),
                    package: encoder.package(variable),
                });
                if goal.is_satisfied(&next) {
                    return Ok(RoundOutcome::Found(Plan {
                        actions,
                        cost: g,
                    }));
                }
                on_path.insert(next.clone());
                stack.push(Frame::new(next, g, encoder, config));
            }
        }
    }

    Ok(RoundOutcome::Exhausted { clipped })
}
