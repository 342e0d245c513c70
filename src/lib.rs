//! Computes package upgrade plans with a SAT solver as validity oracle.
//!
//! Given a repository of package variants (each with dependency and conflict
//! rules), a currently installed set and a list of signed post-state
//! constraints, the planner finds a minimum-cost ordered sequence of install
//! and remove actions that never passes through an invalid intermediate
//! state. Dependency and conflict rules are compiled into a CNF model over
//! package variables; an incremental SAT solver answers per-state validity
//! queries via assumption literals, and a cost-guided best-first search (or,
//! optionally, an iterative-deepening depth-first search) explores the space
//! of single-package toggles until a state satisfies every constraint.
//!
//! ```
//! use plano::{PackageRecord, Planner, Repository};
//!
//! let repository = Repository::from_records([
//!     PackageRecord {
//!         name: "a".into(),
//!         version: "1.0".into(),
//!         size: 10,
//!         depends: vec![vec!["b".into()]],
//!         conflicts: vec![],
//!     },
//!     PackageRecord {
//!         name: "b".into(),
//!         version: "1.0".into(),
//!         size: 5,
//!         depends: vec![],
//!         conflicts: vec![],
//!     },
//! ]);
//!
//! let planner = Planner::new(repository);
//! let plan = planner.plan::<&str, _>(&[], &["+a"]).unwrap();
//! assert_eq!(plan.cost, 15);
//! assert_eq!(plan.display(planner.repository()).to_string(), "+b=1.0\n+a=1.0\n");
//! ```

#![deny(missing_docs)]

mod constraint;
mod encoding;
mod error;
mod goal;
pub(crate) mod internal;
mod oracle;
mod planner;
mod repository;
mod search;
mod version;

pub use constraint::{ConstraintExpr, Operator};
pub use encoding::{Clause, Encoder, Literal, State};
pub use error::PlanError;
pub use goal::Goal;
pub use internal::id::{PackageId, VariableId};
pub use oracle::SatOracle;
pub use planner::{Action, ActionDisplay, Plan, PlanDisplay, Planner};
pub use repository::{PackageRecord, Repository};
pub use search::{SearchConfig, Strategy, DEFAULT_REMOVE_PENALTY};
pub use version::Version;
