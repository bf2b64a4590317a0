//! Preset boards that pin guess colours and feedback marks

use super::{BoardDimensions, Colour, FeedbackKind};
use crate::error::DomainError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fixed scenario: guessed colours and the feedback they received.
///
/// Either board may be shorter than the encoding (later rows stay free), but
/// every row given must span all columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub guesses: Vec<Vec<Colour>>,
    #[serde(default)]
    pub feedback: Vec<Vec<FeedbackKind>>,
}

impl Fixture {
    pub fn new(guesses: Vec<Vec<Colour>>, feedback: Vec<Vec<FeedbackKind>>) -> Self {
        Self { guesses, feedback }
    }

    /// Build a fixture from string labels
    pub fn from_labels(guesses: &[&[&str]], feedback: &[&[FeedbackKind]]) -> Self {
        Self {
            guesses: guesses
                .iter()
                .map(|row| row.iter().map(|&label| Colour::from(label)).collect())
                .collect(),
            feedback: feedback.iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// Check both boards fit the given dimensions
    pub fn validate(&self, dimensions: &BoardDimensions) -> Result<(), DomainError> {
        Self::check_board("guess", self.guesses.iter().map(Vec::len), self.guesses.len(), dimensions)?;
        Self::check_board("feedback", self.feedback.iter().map(Vec::len), self.feedback.len(), dimensions)
    }

    fn check_board(
        board: &'static str,
        row_lengths: impl Iterator<Item = usize>,
        rows: usize,
        dimensions: &BoardDimensions,
    ) -> Result<(), DomainError> {
        if rows > dimensions.rows {
            return Err(DomainError::FixtureTooTall { board, rows, max: dimensions.rows });
        }
        for (row, found) in row_lengths.enumerate() {
            if found != dimensions.columns {
                return Err(DomainError::FixtureShape {
                    board,
                    row,
                    expected: dimensions.columns,
                    found,
                });
            }
        }
        Ok(())
    }

    pub fn guess_row(&self, row: usize) -> Option<&[Colour]> {
        self.guesses.get(row).map(Vec::as_slice)
    }

    pub fn feedback_row(&self, row: usize) -> Option<&[FeedbackKind]> {
        self.feedback.get(row).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty() && self.feedback.is_empty()
    }
}

/// Load a fixture from a YAML file
pub fn load_fixture_from_file<P: AsRef<Path>>(path: P) -> Result<Fixture> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read fixture file: {}", path.as_ref().display()))?;

    parse_fixture(&content)
        .with_context(|| format!("Failed to parse fixture from file: {}", path.as_ref().display()))
}

/// Parse a fixture from its YAML representation
pub fn parse_fixture(content: &str) -> Result<Fixture> {
    let fixture: Fixture = serde_yaml::from_str(content).context("Invalid fixture YAML")?;
    Ok(fixture)
}

/// Save a fixture as YAML
pub fn save_fixture_to_file<P: AsRef<Path>>(fixture: &Fixture, path: P) -> Result<()> {
    let content = serde_yaml::to_string(fixture).context("Failed to serialize fixture")?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write fixture to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Write example fixtures into a directory
pub fn create_example_fixtures<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    use FeedbackKind::*;

    let two_blacks = Fixture::from_labels(
        &[&["yellow", "purple", "green", "red"]],
        &[&[Black, Empty, Black, Empty]],
    );
    save_fixture_to_file(&two_blacks, dir.join("two_blacks.yaml"))?;

    let two_rows = Fixture::from_labels(
        &[&["yellow", "purple", "green", "red"], &["yellow", "teal", "green", "orange"]],
        &[&[Black, Empty, Black, Empty], &[Black, White, Black, White]],
    );
    save_fixture_to_file(&two_rows, dir.join("two_rows.yaml"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_fixture() {
        let content = "guesses:\n  - [yellow, purple]\nfeedback:\n  - [black, white]\n";
        let fixture = parse_fixture(content).unwrap();

        assert_eq!(fixture.guess_row(0).unwrap(), &[Colour::from("yellow"), Colour::from("purple")]);
        assert_eq!(fixture.feedback_row(0).unwrap(), &[FeedbackKind::Black, FeedbackKind::White]);
        assert!(fixture.guess_row(1).is_none());
    }

    #[test]
    fn test_partial_fixture() {
        let fixture = parse_fixture("guesses:\n  - [red, green]\n").unwrap();
        assert!(fixture.feedback.is_empty());
        assert!(!fixture.is_empty());
    }

    #[test]
    fn test_invalid_feedback_mark() {
        assert!(parse_fixture("feedback:\n  - [black, grey]\n").is_err());
    }

    #[test]
    fn test_validate_shape() {
        let dims = BoardDimensions::new(2, 1).unwrap();

        let ok = Fixture::from_labels(&[&["red", "green"]], &[&[FeedbackKind::Black, FeedbackKind::Empty]]);
        assert!(ok.validate(&dims).is_ok());

        let short = Fixture::from_labels(&[&["red"]], &[]);
        assert_eq!(
            short.validate(&dims).unwrap_err(),
            DomainError::FixtureShape { board: "guess", row: 0, expected: 2, found: 1 }
        );

        let tall = Fixture::from_labels(&[&["red", "green"], &["green", "red"]], &[]);
        assert!(matches!(
            tall.validate(&dims).unwrap_err(),
            DomainError::FixtureTooTall { board: "guess", rows: 2, max: 1 }
        ));
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested/fixture.yaml");

        let fixture = Fixture::from_labels(&[&["red", "green"]], &[&[FeedbackKind::White, FeedbackKind::Empty]]);
        save_fixture_to_file(&fixture, &path).unwrap();

        let loaded = load_fixture_from_file(&path).unwrap();
        assert_eq!(loaded, fixture);
    }

    #[test]
    fn test_create_example_fixtures() {
        let temp_dir = tempdir().unwrap();
        create_example_fixtures(temp_dir.path()).unwrap();

        let fixture = load_fixture_from_file(temp_dir.path().join("two_rows.yaml")).unwrap();
        assert_eq!(fixture.guesses.len(), 2);
        assert_eq!(fixture.feedback[1][1], FeedbackKind::White);
        assert!(temp_dir.path().join("two_blacks.yaml").exists());
    }
}
