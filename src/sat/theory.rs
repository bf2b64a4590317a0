//! Compiled formula and the queries it answers

use super::constraints::Clause;
use super::solver::{SatSolver, SolutionCount, SolveResult, SolverOptions};
use super::variables::{Variable, VariableRegistry, VariableStatistics};
use crate::error::{DomainError, Error, Result};
use crate::mastermind::{Colour, FeedbackKind};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Immutable conjunction of clauses over the registered variables.
///
/// Every query runs on a fresh solver instance, so a `Theory` can be shared
/// between threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct Theory {
    registry: VariableRegistry,
    clauses: Vec<Clause>,
    options: SolverOptions,
}

impl Theory {
    pub(crate) fn new(registry: VariableRegistry, clauses: Vec<Clause>, options: SolverOptions) -> Self {
        Self { registry, clauses, options }
    }

    /// Same formula, different solver limits
    pub fn with_options(&self, options: SolverOptions) -> Self {
        Self {
            registry: self.registry.clone(),
            clauses: self.clauses.clone(),
            options,
        }
    }

    /// Whether any model exists
    pub fn satisfiable(&self) -> Result<bool> {
        Ok(self.solve()?.is_some())
    }

    /// One satisfying assignment over every registered variable, or `None` when UNSAT
    pub fn solve(&self) -> Result<Option<Assignment>> {
        match self.oracle(&[]).solve() {
            SolveResult::Satisfiable(solution) => Ok(Some(self.assignment_from(&solution.assignment))),
            SolveResult::Unsatisfiable => Ok(None),
            SolveResult::Timeout => Err(Error::Interrupted),
        }
    }

    /// Number of models over the full variable universe.
    ///
    /// Registered variables that occur in no clause are unconstrained and
    /// double the count each.
    pub fn count_solutions(&self) -> SolutionCount {
        self.count_with(&[])
    }

    /// Fraction of models in which `literal` holds; 0 when the theory is UNSAT
    pub fn likelihood(&self, literal: i32) -> Result<f64> {
        self.check_literal(literal)?;
        let total = Self::exact(self.count_solutions())?;
        self.ratio(total, literal)
    }

    pub fn likelihood_of(&self, variable: &Variable) -> Result<f64> {
        let id = self
            .registry
            .lookup(variable)
            .ok_or_else(|| DomainError::UnknownVariable(variable.to_string()))?;
        self.likelihood(id)
    }

    /// Likelihoods of many literals, evaluated in parallel
    pub fn likelihoods(&self, literals: &[i32]) -> Vec<Result<f64>> {
        let total = Self::exact(self.count_solutions());

        literals
            .par_iter()
            .map(|&literal| {
                self.check_literal(literal)?;
                let total = total.clone()?;
                self.ratio(total, literal)
            })
            .collect()
    }

    fn ratio(&self, total: u128, literal: i32) -> Result<f64> {
        if total == 0 {
            return Ok(0.0);
        }
        let holding = Self::exact(self.count_with(&[Clause::unit(literal)]))?;
        Ok(holding as f64 / total as f64)
    }

    fn exact(count: SolutionCount) -> Result<u128> {
        match count {
            SolutionCount::Exact(n) => Ok(n),
            SolutionCount::Incomplete { found, .. } => Err(Error::IncompleteCount { found }),
        }
    }

    fn check_literal(&self, literal: i32) -> Result<()> {
        if self.registry.variable(literal.saturating_abs()).is_none() {
            return Err(DomainError::UnknownVariable(format!("literal {}", literal)).into());
        }
        Ok(())
    }

    fn count_with(&self, extra: &[Clause]) -> SolutionCount {
        let mentioned: BTreeSet<i32> = self
            .clauses
            .iter()
            .chain(extra)
            .flat_map(|clause| clause.literals.iter().map(|lit| lit.abs()))
            .collect();

        let free = self
            .registry
            .iter()
            .filter(|(id, _)| !mentioned.contains(id))
            .count();
        let projection: Vec<i32> = mentioned.into_iter().collect();

        self.oracle(extra)
            .count_models(&projection)
            .with_free_variables(free)
    }

    fn oracle(&self, extra: &[Clause]) -> SatSolver {
        let mut solver = SatSolver::new(self.options);
        solver.add_clauses(&self.clauses);
        solver.add_clauses(extra);
        solver
    }

    fn assignment_from(&self, values: &HashMap<i32, bool>) -> Assignment {
        let dimensions = self.registry.dimensions();
        Assignment {
            values: self
                .registry
                .iter()
                .map(|(id, var)| (var.clone(), values.get(&id).copied().unwrap_or(false)))
                .collect(),
            columns: dimensions.columns,
            rows: dimensions.rows,
        }
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn options(&self) -> SolverOptions {
        self.options
    }

    pub fn statistics(&self) -> TheoryStatistics {
        TheoryStatistics {
            variables: self.registry.statistics(),
            clause_count: self.clauses.len(),
            unit_clauses: self.clauses.iter().filter(|c| c.is_unit()).count(),
        }
    }
}

/// A model: every registered variable mapped to a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: HashMap<Variable, bool>,
    columns: usize,
    rows: usize,
}

impl Assignment {
    pub fn value(&self, variable: &Variable) -> Option<bool> {
        self.values.get(variable).copied()
    }

    /// Variables set to true, in sorted order
    pub fn true_variables(&self) -> Vec<&Variable> {
        let mut vars: Vec<_> = self
            .values
            .iter()
            .filter(|(_, value)| **value)
            .map(|(var, _)| var)
            .collect();
        vars.sort();
        vars
    }

    /// Colour held by each answer column
    pub fn answer(&self) -> Vec<Option<Colour>> {
        let mut answer = vec![None; self.columns];
        for var in self.true_variables() {
            if let Variable::Answer { col, colour } = var {
                answer[*col] = Some(colour.clone());
            }
        }
        answer
    }

    /// Colour painted in each column of a guess row
    pub fn guess(&self, row: usize) -> Vec<Option<Colour>> {
        let mut guess = vec![None; self.columns];
        for var in self.true_variables() {
            if let Variable::Colour { col, row: r, colour } = var {
                if *r == row {
                    guess[*col] = Some(colour.clone());
                }
            }
        }
        guess
    }

    /// Feedback mark on each column of a guess row
    pub fn feedback(&self, row: usize) -> Vec<Option<FeedbackKind>> {
        let mut marks = vec![None; self.columns];
        for var in self.true_variables() {
            if let Variable::Feedback { col, row: r, kind } = var {
                if *r == row {
                    marks[*col] = Some(*kind);
                }
            }
        }
        marks
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TheoryStatistics {
    pub variables: VariableStatistics,
    pub clause_count: usize,
    pub unit_clauses: usize,
}

impl fmt::Display for TheoryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variables)?;
        writeln!(f, "Clauses: {} ({} unit)", self.clause_count, self.unit_clauses)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mastermind::{BoardDimensions, Palette};
    use crate::sat::{Encoding, StopReason};
    use std::sync::Arc;
    use std::time::Duration;

    fn encoding(columns: usize, rows: usize, palette: &[&str]) -> Encoding {
        Encoding::new(
            BoardDimensions::new(columns, rows).unwrap(),
            Palette::new(palette.iter().copied()).unwrap(),
        )
    }

    fn structural(columns: usize, rows: usize, palette: &[&str]) -> Arc<Theory> {
        let mut enc = encoding(columns, rows, palette);
        enc.builder().unwrap().structural_rules().unwrap();
        enc.compile().unwrap()
    }

    #[test]
    fn test_theory_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Theory>();
    }

    #[test]
    fn test_structural_count() {
        // Answer: 3^2, guess slots: 3^2, marks: 3^2
        let theory = structural(2, 1, &["a", "b", "c"]);
        assert!(theory.satisfiable().unwrap());
        assert_eq!(theory.count_solutions(), SolutionCount::Exact(729));
    }

    #[test]
    fn test_answer_only_count() {
        let theory = structural(3, 0, &["a", "b"]);
        assert_eq!(theory.count_solutions(), SolutionCount::Exact(8));
    }

    #[test]
    fn test_solve_yields_consistent_model() {
        let theory = structural(2, 1, &["a", "b"]);
        let model = theory.solve().unwrap().unwrap();

        assert_eq!(model.len(), theory.registry().variable_count());
        assert!(model.answer().iter().all(Option::is_some));
        assert!(model.guess(0).iter().all(Option::is_some));
        assert!(model.feedback(0).iter().all(Option::is_some));
    }

    #[test]
    fn test_likelihood_of_forced_literal() {
        let mut enc = encoding(2, 0, &["a", "b"]);
        let mut builder = enc.builder().unwrap();
        builder.structural_rules().unwrap();
        let first = builder.registry().answer_assignment(0, &Colour::from("a")).unwrap();
        builder.force(first);
        let theory = enc.compile().unwrap();

        assert_eq!(theory.likelihood(first).unwrap(), 1.0);
        assert_eq!(theory.likelihood(-first).unwrap(), 0.0);

        let other = Variable::Answer { col: 1, colour: Colour::from("b") };
        assert_eq!(theory.likelihood_of(&other).unwrap(), 0.5);
    }

    #[test]
    fn test_likelihood_unsat_is_zero() {
        let mut enc = encoding(2, 0, &["a", "b"]);
        let mut builder = enc.builder().unwrap();
        let var = builder.registry().answer_assignment(0, &Colour::from("a")).unwrap();
        builder.force(var);
        builder.force(-var);
        let theory = enc.compile().unwrap();

        assert!(!theory.satisfiable().unwrap());
        assert!(theory.solve().unwrap().is_none());
        assert_eq!(theory.count_solutions(), SolutionCount::Exact(0));
        assert_eq!(theory.likelihood(var).unwrap(), 0.0);
    }

    #[test]
    fn test_likelihood_unknown_literal() {
        let theory = structural(2, 0, &["a", "b"]);
        assert!(matches!(
            theory.likelihood(0),
            Err(Error::Domain(DomainError::UnknownVariable(_)))
        ));
        assert!(theory.likelihood(100).is_err());

        let missing = Variable::Feedback { col: 0, row: 0, kind: FeedbackKind::Black };
        assert!(theory.likelihood_of(&missing).is_err());
    }

    #[test]
    fn test_parallel_likelihoods_match_sequential() {
        let theory = structural(2, 1, &["a", "b"]);
        let literals: Vec<i32> = (1..=theory.registry().variable_count() as i32).collect();

        let parallel = theory.likelihoods(&literals);
        for (&literal, result) in literals.iter().zip(parallel) {
            let value = result.unwrap();
            assert!((0.0..=1.0).contains(&value));
            assert_eq!(value, theory.likelihood(literal).unwrap());
        }
    }

    #[test]
    fn test_free_variables_double_count() {
        let mut enc = encoding(2, 0, &["a", "b"]);
        let mut builder = enc.builder().unwrap();
        let first = builder.registry().answer_assignment(0, &Colour::from("a")).unwrap();
        // Registered but never constrained
        builder.registry().answer_assignment(1, &Colour::from("a")).unwrap();
        builder.force(first);
        let theory = enc.compile().unwrap();

        assert_eq!(theory.count_solutions(), SolutionCount::Exact(2));
    }

    #[test]
    fn test_incomplete_count_blocks_likelihood() {
        let options = SolverOptions { max_solutions: Some(3), timeout: None };
        let mut enc = encoding(2, 0, &["a", "b", "c"]).with_solver_options(options);
        enc.builder().unwrap().structural_rules().unwrap();
        let theory = enc.compile().unwrap();

        assert!(matches!(theory.count_solutions(), SolutionCount::Incomplete { found: 3, .. }));
        assert_eq!(theory.likelihood(1), Err(Error::IncompleteCount { found: 3 }));

        let unbounded = theory.with_options(SolverOptions::default());
        assert_eq!(unbounded.count_solutions(), SolutionCount::Exact(9));
    }

    #[test]
    fn test_too_many_free_variables_is_not_exact() {
        let mut enc = encoding(4, 10, &["purple", "red", "green", "yellow", "teal", "orange"]);
        let mut builder = enc.builder().unwrap();
        for row in 0..10 {
            for col in 0..4 {
                builder.registry().slot_colours(col, row).unwrap();
            }
        }
        builder.answer_colour_rules().unwrap();
        let theory = enc.compile().unwrap();

        assert_eq!(theory.registry().statistics().colour_variables, 240);
        assert_eq!(
            theory.count_solutions(),
            SolutionCount::Incomplete { found: u128::MAX, reason: StopReason::Overflow }
        );
        assert!(matches!(theory.likelihood(1), Err(Error::IncompleteCount { .. })));
    }

    #[test]
    fn test_expired_deadline_interrupts_queries() {
        let options = SolverOptions { max_solutions: None, timeout: Some(Duration::ZERO) };
        let mut enc = encoding(4, 3, &["purple", "red", "green", "yellow", "teal", "orange"])
            .with_solver_options(options);
        let mut builder = enc.builder().unwrap();
        builder.structural_rules().unwrap();
        builder.feedback_inference_rules().unwrap();
        let theory = enc.compile().unwrap();

        assert_eq!(
            theory.count_solutions(),
            SolutionCount::Incomplete { found: 0, reason: StopReason::Timeout }
        );
        assert_eq!(theory.solve(), Err(Error::Interrupted));
        assert_eq!(theory.satisfiable(), Err(Error::Interrupted));
        assert_eq!(theory.likelihood(1), Err(Error::IncompleteCount { found: 0 }));

        let unbounded = theory.with_options(SolverOptions::default());
        assert_eq!(unbounded.satisfiable(), Ok(true));
    }

    #[test]
    fn test_statistics() {
        let theory = structural(2, 1, &["a", "b"]);
        let stats = theory.statistics();
        assert_eq!(stats.variables.total_variables, 4 + 4 + 6);
        assert_eq!(stats.clause_count, theory.clauses().len());
        assert_eq!(stats.unit_clauses, 0);
    }
}
