//! Mastermind SAT Deduction Engine
//!
//! Encodes a Mastermind board (guesses, feedback marks, hidden answer) as a
//! propositional formula and answers satisfiability, model-count and
//! likelihood queries over it with a SAT oracle.

pub mod config;
pub mod deduction;
pub mod error;
pub mod mastermind;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use deduction::{DeductionProblem, DeductionReport};
pub use error::{DomainError, Error, Result, StateError};
pub use sat::{Encoding, Theory};

/// Main entry point for analysing a configured board
pub fn analyze(settings: Settings) -> anyhow::Result<DeductionReport> {
    let problem = DeductionProblem::new(settings)?;
    problem.analyze()
}
