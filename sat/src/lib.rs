//! A small incremental CDCL solver, used as the hitting set oracle of the explanation enumerator.
//!
//! ```
//! use xdd_sat::{Lit, SatSolver};
//! let mut solver = SatSolver::default();
//! let a = solver.new_var();
//! let b = solver.new_var();
//! solver.add_clause(&[a.true_lit(), b.true_lit()]);
//! solver.add_clause(&[!a.true_lit()]);
//! assert!(solver.solve());
//! assert_eq!(solver.value(b.true_lit()), Some(true));
//! assert_eq!(solver.value(Lit::from_signed_int(-1)), Some(true));
//! ```

pub mod all;
pub mod clause;
pub mod heuristic;
pub mod solver;
pub mod stats;

pub use all::{BVar, Lit};
pub use solver::{SatSolver, SearchParams};
pub use stats::Stats;
