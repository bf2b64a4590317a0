//! Configuration management for the Mastermind deduction engine

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, EncodingConfig, InputConfig, OutputConfig, OutputFormat,
    RowTermination, Settings, SolverConfig,
};
