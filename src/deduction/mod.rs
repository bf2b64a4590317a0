//! Mastermind deduction problem definition and reporting

pub mod problem;
pub mod report;
pub mod validator;

pub use problem::DeductionProblem;
pub use report::{ColourLikelihood, DeductionReport};
pub use validator::{FeedbackMismatch, SolutionValidator, ValidationResult};
