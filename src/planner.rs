//! The planning driver: input resolution, goal construction and search.

use std::fmt::{Display, Formatter};

use crate::{
    constraint::ConstraintExpr,
    encoding::{Encoder, State},
    error::PlanError,
    goal::Goal,
    internal::id::PackageId,
    oracle::SatOracle,
    repository::Repository,
    search::{self, SearchConfig},
};

/// One install or remove step of a plan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Action {
    /// `true` to install the package, `false` to remove it.
    pub install: bool,
    /// The package being acted on.
    pub package: PackageId,
}

impl Action {
    /// Renders the action as `+name=version` or `-name=version`.
    pub fn display<'r>(&self, repository: &'r Repository) -> ActionDisplay<'r> {
        ActionDisplay {
            action: *self,
            repository,
        }
    }
}

/// Displays an [`Action`] with its package resolved against the repository.
pub struct ActionDisplay<'r> {
    action: Action,
    repository: &'r Repository,
}

impl Display for ActionDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let record = self.repository.record(self.action.package);
        let sign = if self.action.install { '+' } else { '-' };
        write!(f, "{sign}{}={}", record.name, record.version)
    }
}

/// A successful planning result: the ordered action sequence transforming
/// the initial state into one satisfying all constraints, and its total
/// cost under the configured cost model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    /// The actions, in application order from the initial state.
    pub actions: Vec<Action>,
    /// The summed edge costs of the path.
    pub cost: u64,
}

impl Plan {
    /// Renders the plan one action per line.
    pub fn display<'r>(&'r self, repository: &'r Repository) -> PlanDisplay<'r> {
        PlanDisplay {
            plan: self,
            repository,
        }
    }
}

/// Displays a [`Plan`] with its packages resolved against the repository.
pub struct PlanDisplay<'r> {
    plan: &'r Plan,
    repository: &'r Repository,
}

impl Display for PlanDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for action in &self.plan.actions {
            writeln!(f, "{}", action.display(self.repository))?;
        }
        Ok(())
    }
}

/// Computes minimum-cost upgrade plans against a fixed repository.
///
/// A planner is cheap to reuse: every [`Planner::plan`] call compiles a
/// fresh model covering exactly the closure reachable from its inputs.
pub struct Planner {
    repository: Repository,
    config: SearchConfig,
}

impl Planner {
    /// Creates a planner with the default search configuration.
    pub fn new(repository: Repository) -> Self {
        Self::with_config(repository, SearchConfig::default())
    }

    /// Creates a planner with an explicit search configuration.
    pub fn with_config(repository: Repository, config: SearchConfig) -> Self {
        Self { repository, config }
    }

    /// The repository this planner plans against.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Computes a plan.
    ///
    /// `initial` lists constraint expressions resolving to the currently
    /// installed packages; `constraints` lists signed entries (`+expr` must
    /// end up installed, `-expr` must end up absent). Every entry must
    /// resolve to at least one package or the call fails before any search
    /// begins.
    pub fn plan<S, T>(&self, initial: &[S], constraints: &[T]) -> Result<Plan, PlanError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut encoder = Encoder::new(&self.repository);

        let mut installed = Vec::new();
        for entry in initial {
            let entry = entry.as_ref();
            let matches = self.resolve(entry);
            if matches.is_empty() {
                return Err(PlanError::UnresolvedInitial(entry.to_owned()));
            }
            // Every matching variant counts as installed, like the input
            // format prescribes for ambiguous entries.
            for package in matches {
                installed.push(encoder.discover(package));
            }
        }

        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for entry in constraints {
            let entry = entry.as_ref();
            let (install, expr) = if let Some(rest) = entry.strip_prefix('+') {
                (true, rest)
            } else if let Some(rest) = entry.strip_prefix('-') {
                (false, rest)
            } else {
                return Err(PlanError::MalformedConstraint(entry.to_owned()));
            };

            let matches = self.resolve(expr);
            if matches.is_empty() {
                return Err(PlanError::UnresolvedConstraint(entry.to_owned()));
            }
            let variables: Vec<_> = matches
                .into_iter()
                .map(|package| encoder.discover(package))
                .collect();
            if install {
                positive.push(variables);
            } else {
                negative.extend(variables);
            }
        }

        let goal = Goal::new(positive, negative);
        tracing::info!(
            variables = encoder.variable_count(),
            clauses = encoder.clauses().len(),
            alternatives = goal.alternative_count(),
            "model compiled"
        );

        // The model is frozen from here on; only assumptions vary per query.
        let mut oracle = SatOracle::new(&encoder, self.config.reclaim_interval);
        let initial_state = State::new(encoder.variable_count(), installed);
        search::run(&encoder, &mut oracle, &goal, initial_state, &self.config)
    }

    /// Resolves one top-level entry against the repository. A parse failure
    /// resolves to nothing; the caller turns empty results into the fatal
    /// error fitting the entry's role.
    fn resolve(&self, entry: &str) -> Vec<PackageId> {
        let Some(expr) = ConstraintExpr::parse(entry) else {
            return Vec::new();
        };
        self.repository.matching(&expr).collect()
    }
}
