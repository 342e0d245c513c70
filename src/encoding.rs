//! Compilation of dependency and conflict rules into a CNF model.
//!
//! The [`Encoder`] lazily discovers the transitive closure of packages
//! reachable from the initial state and the constraint set. Every discovered
//! package receives a dense [`VariableId`]; for each of its dependency
//! groups a clause `¬p ∨ a₁ ∨ … ∨ aₙ` is emitted ("if installed, some
//! alternative must be installed too") and for each conflicting variant a
//! clause `¬p ∨ ¬c`. The clause list only ever grows within a run and is
//! frozen into a [`SatOracle`](crate::SatOracle) before the search starts.

use bitvec::{bitbox, boxed::BitBox};

use crate::{
    constraint::ConstraintExpr,
    internal::id::{PackageId, VariableId},
    repository::Repository,
};

/// A signed reference to a package variable.
///
/// Positive means "installed", negative "not installed".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(i32);

impl Literal {
    /// The "installed" literal of a variable.
    pub fn positive(variable: VariableId) -> Self {
        Literal(variable.to_dimacs())
    }

    /// The "not installed" literal of a variable.
    pub fn negative(variable: VariableId) -> Self {
        Literal(-variable.to_dimacs())
    }

    /// The variable this literal refers to.
    pub fn variable(self) -> VariableId {
        VariableId::from_usize(self.0.unsigned_abs() as usize - 1)
    }

    /// Whether this is the "installed" polarity.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// The DIMACS integer encoding of this literal.
    pub fn to_dimacs(self) -> i32 {
        self.0
    }
}

/// A disjunction of literals.
pub type Clause = Vec<Literal>;

/// A total assignment over all discovered variables.
///
/// Stored as a bit per variable so that equality and hashing are independent
/// of the order in which packages were toggled, which the dominance-pruning
/// map relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    installed: BitBox,
}

impl State {
    /// Creates an assignment over `variable_count` variables with exactly
    /// the given variables installed.
    pub fn new(variable_count: usize, installed: impl IntoIterator<Item = VariableId>) -> Self {
        let mut bits = bitbox![0; variable_count];
        for variable in installed {
            bits.set(variable.to_usize(), true);
        }
        State { installed: bits }
    }

    /// The number of variables covered by this assignment.
    pub fn variable_count(&self) -> usize {
        self.installed.len()
    }

    /// Whether the given variable is assigned "installed".
    pub fn is_installed(&self, variable: VariableId) -> bool {
        self.installed[variable.to_usize()]
    }

    /// Returns a copy of this assignment with one variable's sign flipped.
    pub fn toggled(&self, variable: VariableId) -> State {
        let mut bits = self.installed.clone();
        let index = variable.to_usize();
        let value = !bits[index];
        bits.set(index, value);
        State { installed: bits }
    }

    /// Every variable's literal, in variable order.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.installed.iter().by_vals().enumerate().map(|(index, on)| {
            let variable = VariableId::from_usize(index);
            if on {
                Literal::positive(variable)
            } else {
                Literal::negative(variable)
            }
        })
    }
}

/// The compilation context: owns the variable id counter, the variable →
/// package table and the emitted CNF model.
///
/// Discovery is idempotent per package; a package's variable is assigned
/// before its rules are compiled, so mutually dependent packages terminate
/// without special casing.
pub struct Encoder<'repo> {
    repo: &'repo Repository,
    /// Variable index → package. Dense; `variables[i]` has DIMACS id `i + 1`.
    variables: Vec<PackageId>,
    /// Package → assigned variable, doubling as the "discovered" marker.
    assigned: Vec<Option<VariableId>>,
    clauses: Vec<Clause>,
}

impl<'repo> Encoder<'repo> {
    /// Creates an empty model over the given repository.
    pub fn new(repo: &'repo Repository) -> Self {
        Self {
            repo,
            variables: Vec::new(),
            assigned: vec![None; repo.len()],
            clauses: Vec::new(),
        }
    }

    /// The repository this model is compiled against.
    pub fn repository(&self) -> &'repo Repository {
        self.repo
    }

    /// The number of variables discovered so far.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// The clauses emitted so far.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// The package a variable was assigned to.
    ///
    /// Panics if the variable was not assigned by this encoder.
    pub fn package(&self, variable: VariableId) -> PackageId {
        self.variables[variable.to_usize()]
    }

    /// The variable assigned to a package, if it has been discovered.
    pub fn variable_of(&self, package: PackageId) -> Option<VariableId> {
        self.assigned[package.to_usize()]
    }

    /// The install cost of the package behind a variable.
    pub fn install_cost(&self, variable: VariableId) -> u64 {
        self.repo.record(self.package(variable)).size
    }

    /// Brings a package into the discovered closure, assigning its variable
    /// and emitting its dependency and conflict clauses. Idempotent: a
    /// second discovery of the same package changes nothing.
    pub fn discover(&mut self, package: PackageId) -> VariableId {
        if let Some(variable) = self.assigned[package.to_usize()] {
            return variable;
        }

        let variable = VariableId::from_usize(self.variables.len());
        self.variables.push(package);
        self.assigned[package.to_usize()] = Some(variable);

        let record = self.repo.record(package);
        tracing::trace!(
            package = %record.name,
            version = %record.version,
            %variable,
            "discovered package"
        );

        for group in &record.depends {
            let mut clause = vec![Literal::negative(variable)];
            for alternative in group {
                // Unparseable alternatives and unknown names contribute no
                // candidates; a group that ends up empty leaves the bare
                // negative literal, making the package uninstallable.
                let Some(expr) = ConstraintExpr::parse(alternative) else {
                    continue;
                };
                let candidates: Vec<_> = self.repo.matching(&expr).collect();
                for candidate in candidates {
                    let candidate_variable = self.discover(candidate);
                    clause.push(Literal::positive(candidate_variable));
                }
            }
            self.clauses.push(clause);
        }

        for conflict in &record.conflicts {
            let Some(expr) = ConstraintExpr::parse(conflict) else {
                continue;
            };
            let candidates: Vec<_> = self.repo.matching(&expr).collect();
            for candidate in candidates {
                let candidate_variable = self.discover(candidate);
                self.clauses
                    .push(vec![
                        Literal::negative(variable),
                        Literal::negative(candidate_variable),
                    ]);
            }
        }

        variable
    }
}
