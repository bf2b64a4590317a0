//! SAT solver integration using CaDiCaL

use super::constraints::Clause;
use cadical::{Callbacks, Solver};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Termination callback that stops CaDiCaL once a wall-clock deadline passes
#[derive(Debug, Clone, Copy, Default)]
struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

impl Callbacks for Deadline {
    fn terminate(&mut self) -> bool {
        self.expired()
    }
}

/// Bounds on solver work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverOptions {
    /// Stop model enumeration after this many models
    pub max_solutions: Option<u64>,
    /// Wall-clock budget for one query (a whole enumeration counts as one query)
    pub timeout: Option<Duration>,
}

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver<Deadline>,
    deadline: Deadline,
    variable_count: usize,
    clause_count: usize,
    has_empty_clause: bool,
    options: SolverOptions,
}

/// A satisfying assignment, keyed by SAT id
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: HashMap<i32, bool>,
    pub solve_time: Duration,
}

/// Outcome of a single solve
#[derive(Debug, Clone)]
pub enum SolveResult {
    Satisfiable(SolverSolution),
    Unsatisfiable,
    Timeout,
}

/// Why an enumeration stopped before exhausting the models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    SolutionLimit,
    Timeout,
    /// The count does not fit in 128 bits
    Overflow,
}

/// Result of model counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionCount {
    Exact(u128),
    /// At least `found` models exist
    Incomplete { found: u128, reason: StopReason },
}

impl SolutionCount {
    pub fn exact(&self) -> Option<u128> {
        match *self {
            SolutionCount::Exact(n) => Some(n),
            SolutionCount::Incomplete { .. } => None,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, SolutionCount::Exact(_))
    }

    /// Models found so far (the exact count when complete)
    pub fn found(&self) -> u128 {
        match *self {
            SolutionCount::Exact(n) => n,
            SolutionCount::Incomplete { found, .. } => found,
        }
    }

    /// Scale the count. An exact count that overflows becomes incomplete.
    pub fn scaled(self, factor: u128) -> Self {
        match self {
            SolutionCount::Exact(n) => match n.checked_mul(factor) {
                Some(scaled) => SolutionCount::Exact(scaled),
                None => SolutionCount::Incomplete { found: u128::MAX, reason: StopReason::Overflow },
            },
            SolutionCount::Incomplete { found, reason } => SolutionCount::Incomplete {
                found: found.saturating_mul(factor),
                reason,
            },
        }
    }

    /// Account for `free` unconstrained variables, each doubling the count
    pub fn with_free_variables(self, free: usize) -> Self {
        match u32::try_from(free).ok().and_then(|free| 1u128.checked_shl(free)) {
            Some(factor) => self.scaled(factor),
            // 2^free exceeds u128, so any non-zero count does too
            None => match self {
                SolutionCount::Exact(0) => SolutionCount::Exact(0),
                SolutionCount::Exact(_) => {
                    SolutionCount::Incomplete { found: u128::MAX, reason: StopReason::Overflow }
                }
                SolutionCount::Incomplete { found, reason } => SolutionCount::Incomplete {
                    found: if found == 0 { 0 } else { u128::MAX },
                    reason,
                },
            },
        }
    }
}

impl fmt::Display for SolutionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionCount::Exact(n) => write!(f, "{}", n),
            SolutionCount::Incomplete { found, reason } => write!(f, ">= {} (stopped: {:?})", found, reason),
        }
    }
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new(options: SolverOptions) -> Self {
        Self {
            solver: Solver::new(),
            deadline: Deadline::default(),
            variable_count: 0,
            clause_count: 0,
            has_empty_clause: false,
            options,
        }
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) {
        for clause in clauses {
            self.add_clause(clause);
        }
    }

    /// Add a single clause to the solver. An empty clause makes the formula unsatisfiable.
    pub fn add_clause(&mut self, clause: &Clause) {
        self.clause_count += 1;

        if clause.is_empty() {
            self.has_empty_clause = true;
            return;
        }

        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());
    }

    /// Solve the SAT problem and return the first solution
    pub fn solve(&mut self) -> SolveResult {
        self.arm_deadline();
        let start_time = Instant::now();

        match self.run() {
            Some(true) => SolveResult::Satisfiable(SolverSolution {
                assignment: self.extract_assignment(),
                solve_time: start_time.elapsed(),
            }),
            Some(false) => SolveResult::Unsatisfiable,
            None => SolveResult::Timeout,
        }
    }

    /// Count models projected onto `projection` by blocking each one found.
    ///
    /// Two models that agree on every projected variable count once.
    pub fn count_models(&mut self, projection: &[i32]) -> SolutionCount {
        self.arm_deadline();
        let mut found: u128 = 0;

        loop {
            let limit_reached = self
                .options
                .max_solutions
                .is_some_and(|limit| found >= u128::from(limit));

            match self.run() {
                Some(false) => return SolutionCount::Exact(found),
                None => {
                    return SolutionCount::Incomplete { found, reason: StopReason::Timeout };
                }
                Some(true) if limit_reached => {
                    return SolutionCount::Incomplete { found, reason: StopReason::SolutionLimit };
                }
                Some(true) => {
                    found += 1;
                    if projection.is_empty() {
                        return SolutionCount::Exact(found);
                    }
                    let blocking = self.blocking_clause(projection);
                    self.add_clause(&blocking);
                }
            }
        }
    }

    fn run(&mut self) -> Option<bool> {
        if self.has_empty_clause {
            return Some(false);
        }
        // The oracle only polls the callback once search is under way
        if self.deadline.expired() {
            return None;
        }
        self.solver.solve()
    }

    fn arm_deadline(&mut self) {
        let at = self.options.timeout.map(|timeout| Instant::now() + timeout);
        self.deadline = Deadline { at };
        self.solver.set_callbacks(Some(self.deadline));
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(&self) -> HashMap<i32, bool> {
        (1..=self.variable_count as i32)
            .map(|var| (var, self.solver.value(var).unwrap_or(false)))
            .collect()
    }

    /// Clause excluding the current model's values on `projection`
    fn blocking_clause(&self, projection: &[i32]) -> Clause {
        let literals = projection
            .iter()
            .map(|&var| if self.solver.value(var).unwrap_or(false) { -var } else { var })
            .collect();
        Clause::new(literals)
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

/// Statistics about the loaded formula
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver_with(clauses: &[Vec<i32>]) -> SatSolver {
        let mut solver = SatSolver::new(SolverOptions::default());
        for literals in clauses {
            solver.add_clause(&Clause::new(literals.clone()));
        }
        solver
    }

    #[test]
    fn test_solver_creation() {
        let solver = SatSolver::new(SolverOptions::default());
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn test_simple_satisfiable() {
        // (x1 ∨ x2) ∧ (¬x1 ∨ x2)
        let mut solver = solver_with(&[vec![1, 2], vec![-1, 2]]);

        match solver.solve() {
            SolveResult::Satisfiable(solution) => assert_eq!(solution.assignment.get(&2), Some(&true)),
            other => panic!("expected SAT, got {:?}", other),
        }
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = solver_with(&[vec![1], vec![-1]]);
        assert!(matches!(solver.solve(), SolveResult::Unsatisfiable));
        assert_eq!(solver.count_models(&[1]), SolutionCount::Exact(0));
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        let mut solver = solver_with(&[vec![1, 2], vec![]]);
        assert!(matches!(solver.solve(), SolveResult::Unsatisfiable));
        assert_eq!(solver.clause_count(), 2);
    }

    #[test]
    fn test_count_models() {
        // x1 ∨ x2 has three models over {x1, x2}
        let mut solver = solver_with(&[vec![1, 2]]);
        assert_eq!(solver.count_models(&[1, 2]), SolutionCount::Exact(3));
    }

    #[test]
    fn test_count_models_projection() {
        // Over {x1} only, x1 ∨ x2 still allows both values of x1
        let mut solver = solver_with(&[vec![1, 2]]);
        assert_eq!(solver.count_models(&[1]), SolutionCount::Exact(2));

        let mut solver = solver_with(&[vec![1, 2]]);
        assert_eq!(solver.count_models(&[]), SolutionCount::Exact(1));
    }

    #[test]
    fn test_count_limit() {
        let options = SolverOptions { max_solutions: Some(2), timeout: None };
        let mut solver = SatSolver::new(options);
        solver.add_clause(&Clause::new(vec![1, 2]));

        assert_eq!(
            solver.count_models(&[1, 2]),
            SolutionCount::Incomplete { found: 2, reason: StopReason::SolutionLimit }
        );
    }

    #[test]
    fn test_count_limit_reached_exactly() {
        let options = SolverOptions { max_solutions: Some(3), timeout: None };
        let mut solver = SatSolver::new(options);
        solver.add_clause(&Clause::new(vec![1, 2]));

        assert_eq!(solver.count_models(&[1, 2]), SolutionCount::Exact(3));
    }

    #[test]
    fn test_generous_timeout() {
        let options = SolverOptions { max_solutions: None, timeout: Some(Duration::from_secs(30)) };
        let mut solver = SatSolver::new(options);
        solver.add_clause(&Clause::new(vec![1, -2, 3]));

        assert_eq!(solver.count_models(&[1, 2, 3]), SolutionCount::Exact(7));
    }

    #[test]
    fn test_expired_deadline_stops_queries() {
        let options = SolverOptions { max_solutions: None, timeout: Some(Duration::ZERO) };

        let mut solver = SatSolver::new(options);
        solver.add_clause(&Clause::new(vec![1, 2]));
        assert!(matches!(solver.solve(), SolveResult::Timeout));

        let mut solver = SatSolver::new(options);
        solver.add_clause(&Clause::new(vec![1, 2]));
        assert_eq!(
            solver.count_models(&[1, 2]),
            SolutionCount::Incomplete { found: 0, reason: StopReason::Timeout }
        );
    }

    #[test]
    fn test_empty_clause_wins_over_deadline() {
        let options = SolverOptions { max_solutions: None, timeout: Some(Duration::ZERO) };
        let mut solver = SatSolver::new(options);
        solver.add_clause(&Clause::new(vec![]));
        assert!(matches!(solver.solve(), SolveResult::Unsatisfiable));
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = solver_with(&[vec![1, -5, 3]]);
        assert_eq!(solver.variable_count(), 5);

        solver.add_clause(&Clause::new(vec![2, -7]));
        assert_eq!(solver.variable_count(), 7);
    }

    #[test]
    fn test_solution_count_helpers() {
        let exact = SolutionCount::Exact(3);
        assert_eq!(exact.exact(), Some(3));
        assert_eq!(exact.scaled(4), SolutionCount::Exact(12));
        assert_eq!(exact.with_free_variables(2), SolutionCount::Exact(12));

        let partial = SolutionCount::Incomplete { found: 5, reason: StopReason::Timeout };
        assert_eq!(partial.exact(), None);
        assert_eq!(partial.found(), 5);
        assert!(!partial.is_exact());
    }

    #[test]
    fn test_overflowing_count_is_not_exact() {
        let overflow = SolutionCount::Incomplete { found: u128::MAX, reason: StopReason::Overflow };

        assert_eq!(SolutionCount::Exact(3).scaled(u128::MAX), overflow);
        assert_eq!(SolutionCount::Exact(1).with_free_variables(127), SolutionCount::Exact(1 << 127));
        assert_eq!(SolutionCount::Exact(2).with_free_variables(127), overflow);
        assert_eq!(SolutionCount::Exact(24).with_free_variables(240), overflow);
        assert_eq!(SolutionCount::Exact(0).with_free_variables(240), SolutionCount::Exact(0));

        let timed_out = SolutionCount::Incomplete { found: 0, reason: StopReason::Timeout };
        assert_eq!(timed_out.with_free_variables(240), timed_out);
    }
}
