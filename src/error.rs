//! Error types for the encoding engine

use thiserror::Error;

/// A position or colour outside the configured board was referenced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("column {col} out of bounds (columns: {columns})")]
    ColumnOutOfBounds { col: usize, columns: usize },

    #[error("row {row} out of bounds (rows: {rows})")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("colour '{0}' is not part of the palette")]
    UnknownColour(String),

    #[error("palette needs at least 2 colours, got {0}")]
    PaletteTooSmall(usize),

    #[error("colour '{0}' appears more than once in the palette")]
    DuplicateColour(String),

    #[error("{0} is not a registered variable")]
    UnknownVariable(String),

    #[error("board must have at least one column")]
    NoColumns,

    #[error("{board} board row {row} has {found} entries, expected {expected}")]
    FixtureShape {
        board: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{board} board has {rows} rows but the encoding only has {max}")]
    FixtureTooTall {
        board: &'static str,
        rows: usize,
        max: usize,
    },
}

/// The encoding was used out of sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("encoding has already been compiled")]
    AlreadyCompiled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    State(#[from] StateError),

    /// A single solver call was stopped by its deadline
    #[error("solver was interrupted before reaching a verdict")]
    Interrupted,

    /// Model enumeration stopped early, so no exact ratio exists
    #[error("model enumeration stopped after {found} solutions")]
    IncompleteCount { found: u128 },
}

pub type Result<T> = std::result::Result<T, Error>;
