//! What a deduction run learned about the hidden answer

use super::validator::ValidationResult;
use crate::mastermind::Colour;
use crate::sat::SolutionCount;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Result of analysing one board configuration
#[derive(Debug, Clone, Serialize)]
pub struct DeductionReport {
    pub columns: usize,
    pub rows: usize,
    pub palette: Vec<Colour>,
    /// Whether any hidden answer is consistent with the board
    pub satisfiable: bool,
    /// Models of the whole encoding, over every registered variable
    pub solution_count: SolutionCount,
    /// One consistent answer, if any
    pub witness_answer: Option<Vec<Colour>>,
    /// Re-scoring of the witness against the preset board
    pub witness_check: Option<ValidationResult>,
    /// Per column, the fraction of models placing each colour there.
    /// Absent when the count was cut short.
    pub answer_likelihoods: Option<Vec<Vec<ColourLikelihood>>>,
    /// Per column, the colour every model agrees on
    pub forced_answer: Vec<Option<Colour>>,
    /// Number of guesses a row may take before any feedback
    pub guess_space: u128,
    pub variables: usize,
    pub clauses: usize,
    #[serde(skip)]
    pub solve_time: Duration,
    pub solve_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColourLikelihood {
    pub colour: Colour,
    pub likelihood: f64,
}

impl DeductionReport {
    /// The full answer when every column is forced
    pub fn determined_answer(&self) -> Option<Vec<Colour>> {
        if !self.satisfiable {
            return None;
        }
        self.forced_answer.iter().cloned().collect()
    }

    pub fn is_determined(&self) -> bool {
        self.determined_answer().is_some()
    }

    /// Likelihood of `colour` in `col`, when computed
    pub fn likelihood(&self, col: usize, colour: &Colour) -> Option<f64> {
        self.answer_likelihoods
            .as_ref()?
            .get(col)?
            .iter()
            .find(|entry| &entry.colour == colour)
            .map(|entry| entry.likelihood)
    }

    /// Most likely colour of each column
    pub fn most_likely_answer(&self) -> Option<Vec<ColourLikelihood>> {
        let table = self.answer_likelihoods.as_ref()?;
        table
            .iter()
            .map(|column| {
                column
                    .iter()
                    .max_by(|a, b| a.likelihood.total_cmp(&b.likelihood))
                    .cloned()
            })
            .collect()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save as JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
