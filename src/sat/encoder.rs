//! The encoding under construction and its one-way compilation to a theory

use super::constraints::{Clause, ConstraintBuilder};
use super::solver::SolverOptions;
use super::theory::Theory;
use super::variables::{VariableRegistry, VariableStatistics};
use crate::error::{Result, StateError};
use crate::mastermind::{BoardDimensions, Fixture, Palette};
use std::fmt;
use std::sync::Arc;

enum EncodingState {
    Building {
        registry: VariableRegistry,
        clauses: Vec<Clause>,
    },
    Compiled(Arc<Theory>),
}

/// Append-only clause collector that compiles exactly once.
///
/// Identical clauses are kept as given; repeating a rule does not change the
/// set of models.
pub struct Encoding {
    state: EncodingState,
    options: SolverOptions,
}

impl Encoding {
    pub fn new(dimensions: BoardDimensions, palette: Palette) -> Self {
        Self {
            state: EncodingState::Building {
                registry: VariableRegistry::new(dimensions, palette),
                clauses: Vec::new(),
            },
            options: SolverOptions::default(),
        }
    }

    /// Solver limits handed to the compiled theory
    pub fn with_solver_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Constraint builder over this encoding's registry and clause list
    pub fn builder(&mut self) -> std::result::Result<ConstraintBuilder<'_>, StateError> {
        match &mut self.state {
            EncodingState::Building { registry, clauses } => Ok(ConstraintBuilder::new(registry, clauses)),
            EncodingState::Compiled(_) => Err(StateError::AlreadyCompiled),
        }
    }

    pub fn add_clause(&mut self, clause: Clause) -> std::result::Result<(), StateError> {
        self.builder()?.add_clause(clause);
        Ok(())
    }

    pub fn add_clauses<I>(&mut self, clauses: I) -> std::result::Result<(), StateError>
    where
        I: IntoIterator<Item = Clause>,
    {
        let mut builder = self.builder()?;
        for clause in clauses {
            builder.add_clause(clause);
        }
        Ok(())
    }

    /// Pin a preset board with unit clauses
    pub fn apply_fixture(&mut self, fixture: &Fixture) -> Result<()> {
        self.builder()?.apply_fixture(fixture)?;
        Ok(())
    }

    /// Freeze the clauses into a theory. Fails if already compiled.
    pub fn compile(&mut self) -> std::result::Result<Arc<Theory>, StateError> {
        let theory = match &mut self.state {
            EncodingState::Compiled(_) => return Err(StateError::AlreadyCompiled),
            EncodingState::Building { registry, clauses } => {
                let emptied = VariableRegistry::new(registry.dimensions(), registry.palette().clone());
                let registry = std::mem::replace(registry, emptied);
                let clauses = std::mem::take(clauses);
                Arc::new(Theory::new(registry, clauses, self.options))
            }
        };

        self.state = EncodingState::Compiled(Arc::clone(&theory));
        Ok(theory)
    }

    /// The compiled theory, once `compile` has run
    pub fn theory(&self) -> Option<Arc<Theory>> {
        match &self.state {
            EncodingState::Compiled(theory) => Some(Arc::clone(theory)),
            EncodingState::Building { .. } => None,
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self.state, EncodingState::Compiled(_))
    }

    pub fn registry(&self) -> &VariableRegistry {
        match &self.state {
            EncodingState::Building { registry, .. } => registry,
            EncodingState::Compiled(theory) => theory.registry(),
        }
    }

    pub fn clause_count(&self) -> usize {
        match &self.state {
            EncodingState::Building { clauses, .. } => clauses.len(),
            EncodingState::Compiled(theory) => theory.clauses().len(),
        }
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        let registry = self.registry();
        EncodingStatistics {
            dimensions: registry.dimensions(),
            palette_size: registry.palette().len(),
            variables: registry.statistics(),
            total_clauses: self.clause_count(),
            compiled: self.is_compiled(),
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub dimensions: BoardDimensions,
    pub palette_size: usize,
    pub variables: VariableStatistics,
    pub total_clauses: usize,
    pub compiled: bool,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Board: {} columns x {} rows", self.dimensions.columns, self.dimensions.rows)?;
        writeln!(f, "  Palette size: {}", self.palette_size)?;
        writeln!(f, "  Total variables: {}", self.variables.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "  Compiled: {}", self.compiled)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainError, Error};
    use crate::mastermind::{Colour, FeedbackKind};
    use crate::sat::SolutionCount;

    fn encoding() -> Encoding {
        Encoding::new(
            BoardDimensions::new(2, 1).unwrap(),
            Palette::new(["red", "green"]).unwrap(),
        )
    }

    #[test]
    fn test_compile_once() {
        let mut enc = encoding();
        enc.builder().unwrap().answer_colour_rules().unwrap();
        assert!(!enc.is_compiled());
        assert!(enc.theory().is_none());

        let theory = enc.compile().unwrap();
        assert!(enc.is_compiled());
        assert_eq!(theory.clauses().len(), 4);
        assert!(Arc::ptr_eq(&theory, &enc.theory().unwrap()));

        assert_eq!(enc.compile().unwrap_err(), StateError::AlreadyCompiled);
    }

    #[test]
    fn test_no_additions_after_compile() {
        let mut enc = encoding();
        enc.compile().unwrap();

        assert!(enc.builder().is_err());
        assert_eq!(enc.add_clause(Clause::unit(1)).unwrap_err(), StateError::AlreadyCompiled);
        assert_eq!(
            enc.add_clauses(vec![Clause::unit(1), Clause::unit(2)]).unwrap_err(),
            StateError::AlreadyCompiled
        );

        let fixture = Fixture::from_labels(&[&["red", "green"]], &[]);
        assert_eq!(
            enc.apply_fixture(&fixture).unwrap_err(),
            Error::State(StateError::AlreadyCompiled)
        );
    }

    #[test]
    fn test_registry_survives_compile() {
        let mut enc = encoding();
        let id = enc
            .builder()
            .unwrap()
            .registry()
            .answer_assignment(1, &Colour::from("green"))
            .unwrap();
        enc.add_clause(Clause::unit(id)).unwrap();
        enc.compile().unwrap();

        assert_eq!(enc.registry().variable_count(), 1);
        assert_eq!(enc.clause_count(), 1);
    }

    #[test]
    fn test_duplicate_rules_are_harmless() {
        let mut once = encoding();
        once.builder().unwrap().structural_rules().unwrap();
        let once = once.compile().unwrap();

        let mut twice = encoding();
        let mut builder = twice.builder().unwrap();
        builder.structural_rules().unwrap();
        builder.structural_rules().unwrap();
        let twice = twice.compile().unwrap();

        assert_eq!(twice.clauses().len(), 2 * once.clauses().len());
        assert_eq!(once.count_solutions(), twice.count_solutions());
        assert_eq!(once.count_solutions(), SolutionCount::Exact(4 * 4 * 9));
    }

    #[test]
    fn test_fixture_errors_surface() {
        let mut enc = encoding();
        let fixture = Fixture::from_labels(&[&["red", "blue"]], &[&[FeedbackKind::Black, FeedbackKind::Black]]);
        assert_eq!(
            enc.apply_fixture(&fixture).unwrap_err(),
            Error::Domain(DomainError::UnknownColour("blue".to_string()))
        );
    }

    #[test]
    fn test_statistics() {
        let mut enc = encoding();
        enc.builder().unwrap().structural_rules().unwrap();

        let stats = enc.statistics();
        assert_eq!(stats.palette_size, 2);
        assert_eq!(stats.variables.total_variables, 4 + 4 + 6);
        assert!(!stats.compiled);
        assert!(stats.to_string().contains("2 columns x 1 rows"));
    }
}
