//! Error types of the planning pipeline.

use thiserror::Error;

/// Errors produced while resolving inputs or searching for a plan.
///
/// Input-resolution failures abort before any search begins and carry the
/// offending entry. Search failures distinguish true infeasibility
/// ([`PlanError::NoPlanFound`]) from running out of configured budget
/// ([`PlanError::BudgetExhausted`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// An initial-state entry did not resolve to any repository package.
    #[error("initial state entry `{0}` does not match any package in the repository")]
    UnresolvedInitial(String),

    /// A constraint entry did not resolve to any repository package.
    #[error("constraint `{0}` does not match any package in the repository")]
    UnresolvedConstraint(String),

    /// A constraint entry did not start with `+` or `-`.
    #[error("constraint `{0}` must start with `+` or `-`")]
    MalformedConstraint(String),

    /// No sequence of valid states reaches the requested goal.
    #[error("no sequence of valid states reaches the requested goal")]
    NoPlanFound,

    /// The configured search budget ran out before the goal was reached.
    ///
    /// Unlike [`PlanError::NoPlanFound`] this says nothing about whether a
    /// plan exists.
    #[error("search budget exhausted before a plan was found")]
    BudgetExhausted,
}
