//! Display and output formatting utilities

use crate::deduction::DeductionReport;
use crate::mastermind::{Colour, Fixture};
use crate::sat::encoder::EncodingStatistics;

/// Format reports and boards for the console
pub struct ReportFormatter;

impl ReportFormatter {
    /// Format a deduction report for console output
    pub fn format_report(report: &DeductionReport) -> String {
        let mut output = String::new();

        output.push_str("=== Deduction Report ===\n");
        output.push_str(&format!("Board: {} columns x {} rows\n", report.columns, report.rows));
        output.push_str(&format!("Palette: {}\n", Self::join(&report.palette)));
        output.push_str(&format!("Satisfiable: {}\n", if report.satisfiable { "yes" } else { "no" }));
        output.push_str(&format!("Models: {}\n", report.solution_count));
        output.push_str(&format!("Guess space: {}\n", report.guess_space));
        output.push_str(&format!("Variables: {}, clauses: {}\n", report.variables, report.clauses));
        output.push_str(&format!("Solve Time: {:.3}s\n", report.solve_time.as_secs_f64()));

        if let Some(ref witness) = report.witness_answer {
            output.push_str(&format!("Witness answer: {}\n", Self::join(witness)));
        }
        if let Some(ref check) = report.witness_check {
            output.push_str(&format!("Witness re-scored: {}\n", if check.is_valid { "ok" } else { "MISMATCH" }));
        }

        output.push_str("Forced answer: ");
        output.push_str(&Self::format_forced(&report.forced_answer));
        output.push('\n');

        if report.answer_likelihoods.is_some() {
            output.push('\n');
            output.push_str(&Self::format_likelihood_table(report));
        }

        output
    }

    /// Format the answer likelihoods as a colour-by-column table
    pub fn format_likelihood_table(report: &DeductionReport) -> String {
        let mut output = String::new();
        let Some(ref table) = report.answer_likelihoods else {
            return output;
        };

        let width = report
            .palette
            .iter()
            .map(|colour| colour.label().len())
            .max()
            .unwrap_or(0)
            .max(6);

        output.push_str(&format!("{:width$} |", "colour", width = width));
        for col in 0..table.len() {
            output.push_str(&format!(" col {:<2} |", col));
        }
        output.push('\n');
        output.push_str(&"-".repeat(width + 1 + table.len() * 9));
        output.push('\n');

        for (index, colour) in report.palette.iter().enumerate() {
            output.push_str(&format!("{:width$} |", colour.label(), width = width));
            for column in table {
                match column.get(index) {
                    Some(entry) => output.push_str(&format!(" {:>6.3} |", entry.likelihood)),
                    None => output.push_str("      - |"),
                }
            }
            output.push('\n');
        }

        output
    }

    /// Format a preset board, one guess row per line with its marks
    pub fn format_fixture(fixture: &Fixture) -> String {
        let mut output = String::new();
        let rows = fixture.guesses.len().max(fixture.feedback.len());

        for row in 0..rows {
            let guess = fixture
                .guess_row(row)
                .map(Self::join)
                .unwrap_or_else(|| "?".to_string());
            let marks: String = fixture
                .feedback_row(row)
                .map(|marks| marks.iter().map(|mark| mark.symbol()).collect())
                .unwrap_or_else(|| "?".to_string());
            output.push_str(&format!("{:2}: {}  [{}]\n", row, guess, marks));
        }

        output
    }

    /// Format encoding statistics for the analyze command
    pub fn format_statistics(stats: &EncodingStatistics) -> String {
        stats.to_string()
    }

    fn format_forced(forced: &[Option<Colour>]) -> String {
        forced
            .iter()
            .map(|colour| colour.as_ref().map_or("?", Colour::label))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn join(colours: &[Colour]) -> String {
        colours.iter().map(Colour::label).collect::<Vec<_>>().join(" ")
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deduction::ColourLikelihood;
    use crate::mastermind::FeedbackKind::*;
    use crate::sat::SolutionCount;
    use std::time::Duration;

    fn report() -> DeductionReport {
        let palette: Vec<Colour> = ["red", "blue"].iter().map(|&l| Colour::from(l)).collect();
        DeductionReport {
            columns: 2,
            rows: 0,
            palette: palette.clone(),
            satisfiable: true,
            solution_count: SolutionCount::Exact(2),
            witness_answer: Some(palette.clone()),
            witness_check: None,
            answer_likelihoods: Some(vec![
                palette
                    .iter()
                    .map(|colour| ColourLikelihood { colour: colour.clone(), likelihood: 0.5 })
                    .collect();
                2
            ]),
            forced_answer: vec![None, None],
            guess_space: 2,
            variables: 4,
            clauses: 8,
            solve_time: Duration::from_millis(1),
            solve_time_ms: 1,
        }
    }

    #[test]
    fn test_report_formatting() {
        let text = ReportFormatter::format_report(&report());
        assert!(text.contains("Satisfiable: yes"));
        assert!(text.contains("Witness answer: red blue"));
        assert!(text.contains("Forced answer: ? ?"));
        assert!(text.contains("Guess space: 2\n"));
        assert!(text.contains("0.500"));
    }

    #[test]
    fn test_likelihood_table_layout() {
        let table = ReportFormatter::format_likelihood_table(&report());
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("col 0"));
        assert!(lines[2].starts_with("red"));
    }

    #[test]
    fn test_fixture_formatting() {
        let fixture = Fixture::from_labels(&[&["red", "blue"]], &[&[Black, White]]);
        let text = ReportFormatter::format_fixture(&fixture);
        assert_eq!(text, " 0: red blue  [BW]\n");
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
