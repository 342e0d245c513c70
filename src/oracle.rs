//! The satisfiability oracle backing the state-validity checks.

use varisat::{ExtendFormula, Lit, Solver};

use crate::encoding::{Clause, Encoder, State};

/// Answers "is the CNF model plus this assignment satisfiable?".
///
/// The model is added to an incremental [`varisat`] solver once; each query
/// passes the candidate assignment as solve-time assumptions, so the clause
/// database is never rebuilt per query. Because the solver accumulates
/// learnt clauses across the many queries of a long search, it is rebuilt
/// from the frozen clause list every `reclaim_interval` queries to bound
/// scratch memory.
pub struct SatOracle {
    solver: Solver<'static>,
    clauses: Vec<Clause>,
    variable_count: usize,
    queries: u64,
    reclaim_interval: u64,
}

impl SatOracle {
    /// Freezes the encoder's CNF model into a solver.
    ///
    /// The encoder must be done discovering; clauses emitted afterwards are
    /// not seen by the oracle.
    pub fn new(encoder: &Encoder<'_>, reclaim_interval: u64) -> Self {
        let clauses = encoder.clauses().to_vec();
        let variable_count = encoder.variable_count();
        let solver = Self::build(&clauses, variable_count);
        Self {
            solver,
            clauses,
            variable_count,
            queries: 0,
            reclaim_interval,
        }
    }

    fn build(clauses: &[Clause], variable_count: usize) -> Solver<'static> {
        let mut solver = Solver::new();
        // Allocate every variable up front; some never occur in a clause
        // but still carry an assumption literal per query.
        let _vars: Vec<_> = solver.new_var_iter(variable_count).collect();
        for clause in clauses {
            let lits: Vec<Lit> = clause
                .iter()
                .map(|literal| Lit::from_dimacs(literal.to_dimacs() as isize))
                .collect();
            solver.add_clause(&lits);
        }
        solver
    }

    /// The number of queries answered so far.
    pub fn queries(&self) -> u64 {
        self.queries
    }

    /// True iff the model conjoined with the given total assignment is
    /// satisfiable.
    pub fn valid(&mut self, state: &State) -> bool {
        if self.reclaim_interval > 0
            && self.queries > 0
            && self.queries % self.reclaim_interval == 0
        {
            tracing::debug!(
                queries = self.queries,
                "rebuilding solver to reclaim learnt-clause memory"
            );
            self.solver = Self::build(&self.clauses, self.variable_count);
        }
        self.queries += 1;

        let assumptions: Vec<Lit> = state
            .literals()
            .map(|literal| Lit::from_dimacs(literal.to_dimacs() as isize))
            .collect();
        self.solver.assume(&assumptions);
        self.solver
            .solve()
            .expect("solving cannot fail without a proof processor attached")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        internal::id::PackageId,
        repository::{PackageRecord, Repository},
    };

    fn package(name: &str, depends: &[&[&str]], conflicts: &[&str]) -> PackageRecord {
        PackageRecord {
            name: name.to_owned(),
            version: "1.0".to_owned(),
            size: 1,
            depends: depends
                .iter()
                .map(|group| group.iter().map(|s| s.to_string()).collect())
                .collect(),
            conflicts: conflicts.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn dependencies_must_be_satisfied() {
        let repo = Repository::from_records([package("a", &[&["b"]], &[]), package("b", &[], &[])]);
        let mut encoder = Encoder::new(&repo);
        let a = encoder.discover(PackageId(0));
        let b = encoder.variable_of(PackageId(1)).unwrap();
        let mut oracle = SatOracle::new(&encoder, 0);

        let n = encoder.variable_count();
        assert!(oracle.valid(&State::new(n, [])));
        assert!(oracle.valid(&State::new(n, [b])));
        assert!(oracle.valid(&State::new(n, [a, b])));
        assert!(!oracle.valid(&State::new(n, [a])));
    }

    #[test]
    fn conflicts_are_symmetric() {
        let repo = Repository::from_records([package("a", &[], &["b"]), package("b", &[], &[])]);
        let mut encoder = Encoder::new(&repo);
        let a = encoder.discover(PackageId(0));
        let b = encoder.variable_of(PackageId(1)).unwrap();
        let mut oracle = SatOracle::new(&encoder, 0);

        let n = encoder.variable_count();
        assert!(oracle.valid(&State::new(n, [a])));
        assert!(oracle.valid(&State::new(n, [b])));
        // Rejected regardless of which package was toggled last.
        assert!(!oracle.valid(&State::new(n, []).toggled(a).toggled(b)));
        assert!(!oracle.valid(&State::new(n, []).toggled(b).toggled(a)));
    }

    #[test]
    fn unsatisfiable_dependency_rejects_installation() {
        let repo = Repository::from_records([package("a", &[&["missing"]], &[])]);
        let mut encoder = Encoder::new(&repo);
        let a = encoder.discover(PackageId(0));
        let mut oracle = SatOracle::new(&encoder, 0);

        assert!(oracle.valid(&State::new(1, [])));
        assert!(!oracle.valid(&State::new(1, [a])));
    }

    #[test]
    fn reclaim_rebuild_preserves_answers() {
        let repo = Repository::from_records([package("a", &[], &["b"]), package("b", &[], &[])]);
        let mut encoder = Encoder::new(&repo);
        let a = encoder.discover(PackageId(0));
        let b = encoder.variable_of(PackageId(1)).unwrap();
        // Rebuild after every query.
        let mut oracle = SatOracle::new(&encoder, 1);

        let n = encoder.variable_count();
        for _ in 0..4 {
            assert!(oracle.valid(&State::new(n, [a])));
            assert!(!oracle.valid(&State::new(n, [a, b])));
        }
        assert_eq!(oracle.queries(), 8);
    }
}
