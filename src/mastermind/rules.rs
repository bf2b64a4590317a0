//! Forward scoring of a guess against a known answer

use super::{Colour, FeedbackKind};

/// Feedback rules engine
pub struct FeedbackRules;

impl FeedbackRules {
    /// Score every slot of a guess against the answer.
    ///
    /// Marks are positional: slot `col` is Black when the answer holds the same
    /// colour in that column, White when the colour occurs in some other column,
    /// and Empty when it does not occur at all.
    pub fn score(guess: &[Colour], answer: &[Colour]) -> Vec<FeedbackKind> {
        guess
            .iter()
            .enumerate()
            .map(|(col, colour)| Self::mark(col, colour, answer))
            .collect()
    }

    /// Mark for a single guessed slot
    pub fn mark(col: usize, colour: &Colour, answer: &[Colour]) -> FeedbackKind {
        if answer.get(col) == Some(colour) {
            FeedbackKind::Black
        } else if answer.contains(colour) {
            FeedbackKind::White
        } else {
            FeedbackKind::Empty
        }
    }

    /// True when every slot is Black
    pub fn is_solved(marks: &[FeedbackKind]) -> bool {
        !marks.is_empty() && marks.iter().all(|&m| m == FeedbackKind::Black)
    }
}
