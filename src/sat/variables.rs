//! Variable registry for the SAT encoding

use crate::error::DomainError;
use crate::mastermind::{BoardDimensions, Colour, FeedbackKind, Palette};
use std::collections::HashMap;
use std::fmt;

/// Propositions used in the encoding, keyed by their meaning
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    /// Guess slot (col, row) is painted `colour`
    Colour { col: usize, row: usize, colour: Colour },
    /// Hidden answer column `col` holds `colour`
    Answer { col: usize, colour: Colour },
    /// Guess slot (col, row) received feedback `kind`
    Feedback { col: usize, row: usize, kind: FeedbackKind },
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Colour { col, row, colour } => write!(f, "Colour: {} @({}, {})", colour, col, row),
            Variable::Answer { col, colour } => write!(f, "Answer: {} @{}", colour, col),
            Variable::Feedback { col, row, kind } => write!(f, "Feedback: {:?} @({}, {})", kind, col, row),
        }
    }
}

/// Interns variables and maps them to SAT ids (positive integers)
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    /// Map from variable to SAT variable ID
    variable_map: HashMap<Variable, i32>,
    /// Reverse map, indexed by ID - 1
    variables: Vec<Variable>,
    dimensions: BoardDimensions,
    palette: Palette,
}

impl VariableRegistry {
    pub fn new(dimensions: BoardDimensions, palette: Palette) -> Self {
        Self {
            variable_map: HashMap::new(),
            variables: Vec::new(),
            dimensions,
            palette,
        }
    }

    /// Get or create the SAT id for a variable
    pub fn get(&mut self, variable: Variable) -> Result<i32, DomainError> {
        if let Some(&id) = self.variable_map.get(&variable) {
            return Ok(id);
        }

        self.validate_variable(&variable)?;

        self.variables.push(variable.clone());
        let id = self.variables.len() as i32;
        self.variable_map.insert(variable, id);
        Ok(id)
    }

    pub fn colour_assignment(&mut self, col: usize, row: usize, colour: &Colour) -> Result<i32, DomainError> {
        self.get(Variable::Colour { col, row, colour: colour.clone() })
    }

    pub fn answer_assignment(&mut self, col: usize, colour: &Colour) -> Result<i32, DomainError> {
        self.get(Variable::Answer { col, colour: colour.clone() })
    }

    pub fn feedback(&mut self, col: usize, row: usize, kind: FeedbackKind) -> Result<i32, DomainError> {
        self.get(Variable::Feedback { col, row, kind })
    }

    /// Colour variables of one guess slot, in palette order
    pub fn slot_colours(&mut self, col: usize, row: usize) -> Result<Vec<i32>, DomainError> {
        let palette = self.palette.clone();
        palette
            .colours()
            .iter()
            .map(|colour| self.colour_assignment(col, row, colour))
            .collect()
    }

    /// Answer variables of one column, in palette order
    pub fn answer_colours(&mut self, col: usize) -> Result<Vec<i32>, DomainError> {
        let palette = self.palette.clone();
        palette
            .colours()
            .iter()
            .map(|colour| self.answer_assignment(col, colour))
            .collect()
    }

    /// Answer variables of one colour, in column order
    pub fn answer_columns(&mut self, colour: &Colour) -> Result<Vec<i32>, DomainError> {
        (0..self.dimensions.columns)
            .map(|col| self.answer_assignment(col, colour))
            .collect()
    }

    /// ID of an existing variable, without creating it
    pub fn lookup(&self, variable: &Variable) -> Option<i32> {
        self.variable_map.get(variable).copied()
    }

    /// Variable behind an ID
    pub fn variable(&self, id: i32) -> Option<&Variable> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.variables.get(index)
    }

    /// All variables with their IDs, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Variable)> {
        self.variables.iter().enumerate().map(|(i, v)| (i as i32 + 1, v))
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    fn validate_variable(&self, variable: &Variable) -> Result<(), DomainError> {
        match variable {
            Variable::Colour { col, row, colour } => {
                self.dimensions.check_column(*col)?;
                self.dimensions.check_row(*row)?;
                self.check_colour(colour)
            }
            Variable::Answer { col, colour } => {
                self.dimensions.check_column(*col)?;
                self.check_colour(colour)
            }
            Variable::Feedback { col, row, .. } => {
                self.dimensions.check_column(*col)?;
                self.dimensions.check_row(*row)
            }
        }
    }

    fn check_colour(&self, colour: &Colour) -> Result<(), DomainError> {
        if !self.palette.contains(colour) {
            return Err(DomainError::UnknownColour(colour.label().to_string()));
        }
        Ok(())
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        let mut stats = VariableStatistics {
            total_variables: self.variable_count(),
            ..Default::default()
        };

        for variable in &self.variables {
            match variable {
                Variable::Colour { .. } => stats.colour_variables += 1,
                Variable::Answer { .. } => stats.answer_variables += 1,
                Variable::Feedback { .. } => stats.feedback_variables += 1,
            }
        }

        stats
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub colour_variables: usize,
    pub answer_variables: usize,
    pub feedback_variables: usize,
}

impl fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Colour variables: {}", self.colour_variables)?;
        writeln!(f, "  Answer variables: {}", self.answer_variables)?;
        writeln!(f, "  Feedback variables: {}", self.feedback_variables)?;
        Ok(())
    }
}
