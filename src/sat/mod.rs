//! SAT encoding components for Mastermind deduction

pub mod variables;
pub mod constraints;
pub mod encoder;
pub mod solver;
pub mod theory;

pub use variables::{Variable, VariableRegistry};
pub use constraints::{Clause, ConstraintBuilder, Scope};
pub use encoder::Encoding;
pub use solver::{SatSolver, SolutionCount, SolverOptions, StopReason};
pub use theory::{Assignment, Theory};
