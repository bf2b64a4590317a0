//! Independent check of a deduced answer against a preset board

use crate::mastermind::{Colour, FeedbackKind, FeedbackRules, Fixture, Palette};
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// Re-scores fixture guesses against a candidate answer
pub struct SolutionValidator {
    palette: Palette,
    columns: usize,
    distinct_answer_colours: bool,
}

/// Result of solution validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub rows_checked: usize,
    pub mismatches: Vec<FeedbackMismatch>,
    pub error_message: Option<String>,
}

/// A slot whose recorded mark disagrees with the re-scored one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackMismatch {
    pub row: usize,
    pub col: usize,
    pub recorded: FeedbackKind,
    pub scored: FeedbackKind,
}

impl SolutionValidator {
    pub fn new(palette: Palette, columns: usize, distinct_answer_colours: bool) -> Self {
        Self {
            palette,
            columns,
            distinct_answer_colours,
        }
    }

    /// Check `answer` is a legal code and reproduces every recorded feedback row
    pub fn validate(&self, answer: &[Colour], fixture: &Fixture) -> ValidationResult {
        if let Some(message) = self.check_answer(answer) {
            return ValidationResult::rejected(message);
        }

        let mut mismatches = Vec::new();
        let mut rows_checked = 0;

        for (row, (guess, recorded)) in fixture.guesses.iter().zip(&fixture.feedback).enumerate() {
            let scored = FeedbackRules::score(guess, answer);
            rows_checked += 1;

            mismatches.extend(
                recorded
                    .iter()
                    .zip(&scored)
                    .enumerate()
                    .filter(|(_, (recorded, scored))| recorded != scored)
                    .map(|(col, (&recorded, &scored))| FeedbackMismatch { row, col, recorded, scored }),
            );
        }

        let is_valid = mismatches.is_empty();
        let error_message = (!is_valid).then(|| format!("{} slot(s) disagree with the recorded feedback", mismatches.len()));

        ValidationResult {
            is_valid,
            rows_checked,
            mismatches,
            error_message,
        }
    }

    fn check_answer(&self, answer: &[Colour]) -> Option<String> {
        if answer.len() != self.columns {
            return Some(format!("Answer has {} colours, expected {}", answer.len(), self.columns));
        }
        if let Some(unknown) = answer.iter().find(|colour| !self.palette.contains(colour)) {
            return Some(format!("Answer uses unknown colour: {}", unknown));
        }
        if self.distinct_answer_colours && !answer.iter().all_unique() {
            return Some("Answer repeats a colour".to_string());
        }
        None
    }
}

impl ValidationResult {
    fn rejected(message: String) -> Self {
        Self {
            is_valid: false,
            rows_checked: 0,
            mismatches: Vec::new(),
            error_message: Some(message),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Rows checked: {}", self.rows_checked)?;
        for mismatch in &self.mismatches {
            writeln!(
                f,
                "  Row {} column {}: recorded {}, scored {}",
                mismatch.row, mismatch.col, mismatch.recorded, mismatch.scored
            )?;
        }
        if let Some(ref error) = self.error_message {
            writeln!(f, "  Error: {}", error)?;
        }
        Ok(())
    }
}
