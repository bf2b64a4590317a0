//! Constraint generation for the Mastermind SAT encoding

use super::VariableRegistry;
use crate::config::RowTermination;
use crate::error::DomainError;
use crate::mastermind::{Colour, FeedbackKind, Fixture};
use itertools::Itertools;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Where a no-duplicate-colour rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One row of the guess board
    GuessRow(usize),
    /// The hidden answer
    Answer,
}

/// Emits clauses over registry variables into an encoding under construction.
///
/// Obtained from [`Encoding::builder`](super::Encoding::builder), which refuses
/// once the encoding has been compiled.
pub struct ConstraintBuilder<'a> {
    registry: &'a mut VariableRegistry,
    clauses: &'a mut Vec<Clause>,
}

impl<'a> ConstraintBuilder<'a> {
    pub(crate) fn new(registry: &'a mut VariableRegistry, clauses: &'a mut Vec<Clause>) -> Self {
        Self { registry, clauses }
    }

    pub fn registry(&mut self) -> &mut VariableRegistry {
        self.registry
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Force a literal to hold in every model
    pub fn force(&mut self, literal: i32) {
        self.add_clause(Clause::unit(literal));
    }

    /// At least one of `vars` holds
    pub fn at_least_one(&mut self, vars: &[i32]) {
        self.add_clause(Clause::new(vars.to_vec()));
    }

    /// No two of `vars` hold together
    pub fn at_most_one(&mut self, vars: &[i32]) {
        for (&a, &b) in vars.iter().tuple_combinations() {
            self.add_clause(Clause::binary(-a, -b));
        }
    }

    pub fn exactly_one(&mut self, vars: &[i32]) {
        self.at_least_one(vars);
        self.at_most_one(vars);
    }

    /// (a1 ∧ a2 ∧ ...) → (c1 ∨ c2 ∨ ...), as a single clause
    pub fn implies(&mut self, antecedents: &[i32], consequents: &[i32]) {
        let mut literals: Vec<i32> = antecedents.iter().map(|&lit| -lit).collect();
        literals.extend_from_slice(consequents);
        self.add_clause(Clause::new(literals));
    }

    /// (a1 ∧ a2 ∧ ...) → (c1 ∧ c2 ∧ ...), one clause per consequent
    pub fn implies_all(&mut self, antecedents: &[i32], consequents: &[i32]) {
        for &consequent in consequents {
            self.implies(antecedents, &[consequent]);
        }
    }

    /// Exactly-one groups for guess colours, answer colours and feedback marks
    pub fn structural_rules(&mut self) -> Result<(), DomainError> {
        self.guess_colour_rules()?;
        self.answer_colour_rules()?;
        self.feedback_mark_rules()
    }

    /// Every guess slot holds exactly one colour
    pub fn guess_colour_rules(&mut self) -> Result<(), DomainError> {
        let dims = self.registry.dimensions();
        for row in 0..dims.rows {
            for col in 0..dims.columns {
                let colours = self.registry.slot_colours(col, row)?;
                self.exactly_one(&colours);
            }
        }
        Ok(())
    }

    /// Every answer column holds exactly one colour
    pub fn answer_colour_rules(&mut self) -> Result<(), DomainError> {
        for col in 0..self.registry.dimensions().columns {
            let colours = self.registry.answer_colours(col)?;
            self.exactly_one(&colours);
        }
        Ok(())
    }

    /// Every guess slot carries exactly one feedback mark
    pub fn feedback_mark_rules(&mut self) -> Result<(), DomainError> {
        let dims = self.registry.dimensions();
        for row in 0..dims.rows {
            for col in 0..dims.columns {
                let marks = self.feedback_marks(col, row)?;
                self.exactly_one(&marks);
            }
        }
        Ok(())
    }

    /// No colour appears in two columns of the scope
    pub fn no_duplicate_colour(&mut self, scope: Scope) -> Result<(), DomainError> {
        let columns = self.registry.dimensions().columns;
        let palette = self.registry.palette().clone();

        for colour in palette.colours() {
            for (col1, col2) in (0..columns).tuple_combinations() {
                let first = self.scoped_variable(scope, col1, colour)?;
                let second = self.scoped_variable(scope, col2, colour)?;
                self.add_clause(Clause::binary(-first, -second));
            }
        }
        Ok(())
    }

    fn scoped_variable(&mut self, scope: Scope, col: usize, colour: &Colour) -> Result<i32, DomainError> {
        match scope {
            Scope::GuessRow(row) => self.registry.colour_assignment(col, row, colour),
            Scope::Answer => self.registry.answer_assignment(col, colour),
        }
    }

    /// Rules tying each slot's guessed colour and feedback mark to the answer
    pub fn feedback_inference_rules(&mut self) -> Result<(), DomainError> {
        let dims = self.registry.dimensions();
        let palette = self.registry.palette().clone();

        for row in 0..dims.rows {
            for col in 0..dims.columns {
                let black = self.registry.feedback(col, row, FeedbackKind::Black)?;
                let white = self.registry.feedback(col, row, FeedbackKind::White)?;
                let empty = self.registry.feedback(col, row, FeedbackKind::Empty)?;

                for colour in palette.colours() {
                    let guessed = self.registry.colour_assignment(col, row, colour)?;
                    let answer = self.registry.answer_columns(colour)?;
                    let here = answer[col];

                    // Mark and guess constrain the answer
                    self.implies(&[black, guessed], &[here]);
                    self.implies(&[white, guessed], &answer);
                    self.implies(&[white, guessed], &[-here]);
                    for &anywhere in &answer {
                        self.implies(&[empty, guessed], &[-anywhere]);
                    }

                    // Guess and answer determine the mark
                    self.implies(&[guessed, here], &[black]);
                    for (other, &elsewhere) in answer.iter().enumerate() {
                        if other != col {
                            self.implies(&[guessed, elsewhere], &[white]);
                        }
                    }
                    let mut absent_or_empty = answer.clone();
                    absent_or_empty.push(empty);
                    self.implies(&[guessed], &absent_or_empty);

                    // Mark and answer constrain the guess
                    self.implies(&[black, here], &[guessed]);
                    for &anywhere in &answer {
                        self.implies(&[empty, anywhere], &[-guessed]);
                    }
                }
            }
        }
        Ok(())
    }

    /// Row `row` carries at least one mark that is not Black
    pub fn unsolved_row(&mut self, row: usize) -> Result<(), DomainError> {
        let columns = self.registry.dimensions().columns;
        let not_black = (0..columns)
            .map(|col| self.registry.feedback(col, row, FeedbackKind::Black).map(|b| -b))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_clause(Clause::new(not_black));
        Ok(())
    }

    /// Apply the all-Black row policy to the board
    pub fn row_termination_rules(&mut self, policy: RowTermination) -> Result<(), DomainError> {
        let rows = self.registry.dimensions().rows;
        let constrained = match policy {
            RowTermination::Unrestricted => 0,
            RowTermination::FinalRowOnly => rows.saturating_sub(1),
            RowTermination::EveryRow => rows,
        };
        for row in 0..constrained {
            self.unsolved_row(row)?;
        }
        Ok(())
    }

    /// Pin the fixture's guess colours and feedback marks with unit clauses
    pub fn apply_fixture(&mut self, fixture: &Fixture) -> Result<(), DomainError> {
        fixture.validate(&self.registry.dimensions())?;

        for (row, guesses) in fixture.guesses.iter().enumerate() {
            for (col, colour) in guesses.iter().enumerate() {
                let var = self.registry.colour_assignment(col, row, colour)?;
                self.force(var);
            }
        }
        for (row, marks) in fixture.feedback.iter().enumerate() {
            for (col, &kind) in marks.iter().enumerate() {
                let var = self.registry.feedback(col, row, kind)?;
                self.force(var);
            }
        }
        Ok(())
    }

    fn feedback_marks(&mut self, col: usize, row: usize) -> Result<Vec<i32>, DomainError> {
        FeedbackKind::ALL
            .iter()
            .map(|&kind| self.registry.feedback(col, row, kind))
            .collect()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }
}
