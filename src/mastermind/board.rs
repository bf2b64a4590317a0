//! Board values: colours, palettes, feedback marks and dimensions

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single colour label drawn from the palette
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Colour(String);

impl Colour {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Colour {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered set of distinct colours, fixed for the lifetime of an encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    /// Create a palette from labels, rejecting duplicates and palettes of fewer than 2 colours
    pub fn new<I, S>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut colours: Vec<Colour> = Vec::new();
        for label in labels {
            let colour = Colour::new(label);
            if colours.contains(&colour) {
                return Err(DomainError::DuplicateColour(colour.0));
            }
            colours.push(colour);
        }

        if colours.len() < 2 {
            return Err(DomainError::PaletteTooSmall(colours.len()));
        }

        Ok(Self { colours })
    }

    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    pub fn contains(&self, colour: &Colour) -> bool {
        self.colours.contains(colour)
    }

    pub fn index_of(&self, colour: &Colour) -> Option<usize> {
        self.colours.iter().position(|c| c == colour)
    }

    /// Look up a label, failing if it is not part of the palette
    pub fn colour(&self, label: &str) -> Result<Colour, DomainError> {
        self.colours
            .iter()
            .find(|c| c.label() == label)
            .cloned()
            .ok_or_else(|| DomainError::UnknownColour(label.to_string()))
    }
}

/// Per-slot feedback mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Right colour in the right column
    Black,
    /// Colour present in the answer, but in another column
    White,
    /// Colour absent from the answer
    Empty,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 3] = [FeedbackKind::Black, FeedbackKind::White, FeedbackKind::Empty];

    pub fn symbol(self) -> char {
        match self {
            FeedbackKind::Black => 'B',
            FeedbackKind::White => 'W',
            FeedbackKind::Empty => 'E',
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Column and row counts of the guess board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDimensions {
    pub columns: usize,
    pub rows: usize,
}

impl BoardDimensions {
    /// Zero rows is allowed and yields an answer-only encoding
    pub fn new(columns: usize, rows: usize) -> Result<Self, DomainError> {
        if columns == 0 {
            return Err(DomainError::NoColumns);
        }
        Ok(Self { columns, rows })
    }

    pub fn slot_count(&self) -> usize {
        self.columns * self.rows
    }

    pub fn check_column(&self, col: usize) -> Result<(), DomainError> {
        if col >= self.columns {
            return Err(DomainError::ColumnOutOfBounds { col, columns: self.columns });
        }
        Ok(())
    }

    pub fn check_row(&self, row: usize) -> Result<(), DomainError> {
        if row >= self.rows {
            return Err(DomainError::RowOutOfBounds { row, rows: self.rows });
        }
        Ok(())
    }
}
