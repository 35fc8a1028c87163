//! Derived bond analytics.

mod yield_solver;

pub use yield_solver::{BondTerms, YieldSolution, YieldSolver, FACE_VALUE};
