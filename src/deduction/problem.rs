//! Mastermind deduction problem definition

use super::report::{ColourLikelihood, DeductionReport};
use super::validator::SolutionValidator;
use crate::config::{OutputFormat, Settings};
use crate::mastermind::{guess_space_size, load_fixture_from_file, BoardDimensions, Colour, Fixture, Palette};
use crate::sat::{Encoding, Scope, SolutionCount, Theory, Variable};
use crate::utils::ColorOutput;
use anyhow::{Context, Result};
use std::time::Instant;

/// A configured board plus the preset guesses and feedback it carries
pub struct DeductionProblem {
    settings: Settings,
    dimensions: BoardDimensions,
    palette: Palette,
    fixture: Option<Fixture>,
    validator: SolutionValidator,
}

impl DeductionProblem {
    /// Create a new problem from settings, loading the fixture file if one is named
    pub fn new(settings: Settings) -> Result<Self> {
        let fixture = match &settings.input.fixture_file {
            Some(path) => Some(load_fixture_from_file(path).context("Failed to load fixture file")?),
            None => None,
        };
        Self::with_fixture(settings, fixture)
    }

    /// Create a problem with an explicit fixture (useful for testing)
    pub fn with_fixture(settings: Settings, fixture: Option<Fixture>) -> Result<Self> {
        let dimensions = settings.dimensions().context("Invalid board size")?;
        let palette = settings.palette().context("Invalid palette")?;

        if let Some(ref fixture) = fixture {
            fixture
                .validate(&dimensions)
                .context("Fixture does not fit the board")?;
        }

        let validator = SolutionValidator::new(
            palette.clone(),
            dimensions.columns,
            settings.encoding.distinct_answer_colours,
        );

        Ok(Self {
            settings,
            dimensions,
            palette,
            fixture,
            validator,
        })
    }

    /// Assemble every rule the settings ask for into an uncompiled encoding
    pub fn build_encoding(&self) -> Result<Encoding> {
        let mut encoding = Encoding::new(self.dimensions, self.palette.clone())
            .with_solver_options(self.settings.solver_options());

        let mut builder = encoding.builder()?;
        builder.structural_rules()?;

        if self.settings.encoding.distinct_guess_colours {
            for row in 0..self.dimensions.rows {
                builder.no_duplicate_colour(Scope::GuessRow(row))?;
            }
        }
        if self.settings.encoding.distinct_answer_colours {
            builder.no_duplicate_colour(Scope::Answer)?;
        }

        builder.feedback_inference_rules()?;
        builder.row_termination_rules(self.settings.encoding.row_termination)?;

        if let Some(ref fixture) = self.fixture {
            builder
                .apply_fixture(fixture)
                .context("Fixture references a colour outside the palette")?;
        }

        Ok(encoding)
    }

    /// Compile the board and report what can be deduced about the answer
    pub fn analyze(&self) -> Result<DeductionReport> {
        let start_time = Instant::now();

        self.progress(&format!(
            "Analysing {}x{} board over {} colours",
            self.dimensions.columns,
            self.dimensions.rows,
            self.palette.len()
        ));

        let mut encoding = self.build_encoding()?;
        let theory = encoding.compile()?;
        self.progress(&theory.statistics().to_string());

        let witness = theory
            .solve()
            .context("Solver stopped before finding a witness")?;
        let witness_answer = witness
            .as_ref()
            .and_then(|assignment| assignment.answer().into_iter().collect::<Option<Vec<_>>>());

        let witness_check = match (&witness_answer, &self.fixture) {
            (Some(answer), Some(fixture)) => {
                let result = self.validator.validate(answer, fixture);
                if !result.is_valid {
                    eprintln!("{}", ColorOutput::warning(&format!("Witness failed re-scoring:\n{}", result)));
                }
                Some(result)
            }
            _ => None,
        };

        let solution_count = theory.count_solutions();
        if let SolutionCount::Incomplete { found, reason } = solution_count {
            eprintln!(
                "{}",
                ColorOutput::warning(&format!(
                    "Model count stopped at {} ({:?}); likelihoods skipped",
                    found, reason
                ))
            );
        }

        let answer_likelihoods = if solution_count.is_exact() {
            Some(self.answer_likelihoods(&theory)?)
        } else {
            None
        };

        let forced_answer = match &answer_likelihoods {
            Some(table) if witness.is_some() => table
                .iter()
                .map(|column| {
                    column
                        .iter()
                        .find(|entry| entry.likelihood == 1.0)
                        .map(|entry| entry.colour.clone())
                })
                .collect(),
            _ => vec![None; self.dimensions.columns],
        };

        let solve_time = start_time.elapsed();
        let stats = theory.statistics();

        let report = DeductionReport {
            columns: self.dimensions.columns,
            rows: self.dimensions.rows,
            palette: self.palette.colours().to_vec(),
            satisfiable: witness.is_some(),
            solution_count,
            witness_answer,
            witness_check,
            answer_likelihoods,
            forced_answer,
            guess_space: self.guess_space(),
            variables: stats.variables.total_variables,
            clauses: stats.clause_count,
            solve_time,
            solve_time_ms: solve_time.as_millis() as u64,
        };

        self.progress(&format!(
            "Finished in {:.3}s: {} model(s)",
            solve_time.as_secs_f64(),
            report.solution_count
        ));

        Ok(report)
    }

    /// Number of guesses a single row may take, honouring the distinct-guess setting
    pub fn guess_space(&self) -> u128 {
        let (colours, columns) = (self.palette.len(), self.dimensions.columns);
        if self.settings.encoding.distinct_guess_colours {
            guess_space_size(colours, columns)
        } else {
            u32::try_from(columns)
                .ok()
                .and_then(|columns| (colours as u128).checked_pow(columns))
                .unwrap_or(u128::MAX)
        }
    }

    /// Likelihood of every answer colour in every column
    fn answer_likelihoods(&self, theory: &Theory) -> Result<Vec<Vec<ColourLikelihood>>> {
        let mut cells: Vec<(usize, Colour)> = Vec::new();
        let mut literals = Vec::new();

        for col in 0..self.dimensions.columns {
            for colour in self.palette.colours() {
                let variable = Variable::Answer { col, colour: colour.clone() };
                let id = theory
                    .registry()
                    .lookup(&variable)
                    .with_context(|| format!("Answer variable {} was never registered", variable))?;
                cells.push((col, colour.clone()));
                literals.push(id);
            }
        }

        let values = theory
            .likelihoods(&literals)
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to compute answer likelihoods")?;

        let mut table = vec![Vec::with_capacity(self.palette.len()); self.dimensions.columns];
        for ((col, colour), likelihood) in cells.into_iter().zip(values) {
            table[col].push(ColourLikelihood { colour, likelihood });
        }
        Ok(table)
    }

    fn progress(&self, message: &str) {
        if self.settings.output.format == OutputFormat::Text {
            println!("{}", ColorOutput::info(message));
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fixture(&self) -> Option<&Fixture> {
        self.fixture.as_ref()
    }

    pub fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Get encoding statistics without solving
    pub fn encoding_statistics(&self) -> Result<crate::sat::encoder::EncodingStatistics> {
        Ok(self.build_encoding()?.statistics())
    }
}
