//! Solver seam.
//!
//! The core never inspects solver internals or backend-specific option
//! names: it hands a [`ScheduleModel`] to anything implementing
//! [`Solver`] together with explicit time/gap limits, and gets back a
//! status plus one value per variable.
//!
//! A stopped-early result (time limit, gap reached) is *usable*, never
//! an error — callers decide whether a non-proven-optimal roster is
//! acceptable. An infeasible status, by contrast, can only mean the
//! assembled model is defective (slack variables make minimum staffing
//! always satisfiable); the planner treats it as such.
//!
//! [`MilpSolver`] is the bundled backend: `good_lp` over the pure-Rust
//! `microlp` branch-and-bound solver.

use std::time::Duration;

use good_lp::{default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ConstraintSense, ScheduleModel, VarDomain};

/// Budget handed to the backend.
///
/// Backends that cannot honor a limit solve to proven optimality and
/// report [`SolveStatus::Optimal`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveLimits {
    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
    /// Acceptable relative optimality gap (e.g. 0.02 for 2%).
    pub gap_target: Option<f64>,
}

impl SolveLimits {
    /// No limits: solve to proven optimality.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the acceptable relative gap.
    pub fn with_gap_target(mut self, gap: f64) -> Self {
        self.gap_target = Some(gap);
        self
    }
}

/// How the backend terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Feasible within the requested gap, optimality not proven.
    FeasibleWithinGap,
    /// Stopped at the time limit with a feasible incumbent.
    TimeLimitReached,
    /// No feasible solution exists for the handed model.
    Infeasible,
}

impl SolveStatus {
    /// Whether the returned values form a usable (if possibly
    /// suboptimal) schedule.
    #[inline]
    pub fn is_usable(&self) -> bool {
        !matches!(self, SolveStatus::Infeasible)
    }
}

/// Backend result: status plus one value per model variable.
///
/// `values` is empty when the status is [`SolveStatus::Infeasible`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Value per variable, indexed like `ScheduleModel::variables`.
    pub values: Vec<f64>,
    /// Objective value of `values`.
    pub objective: f64,
    /// Relative optimality gap, when the backend reports one.
    pub gap: Option<f64>,
}

/// A backend failure (not infeasibility — that is a status).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("solver backend failure: {0}")]
    Backend(String),
}

/// An opaque MILP backend.
pub trait Solver {
    /// Solves the model within the given limits.
    fn solve(&self, model: &ScheduleModel, limits: &SolveLimits)
        -> Result<SolveOutcome, SolveError>;
}

/// `good_lp`/`microlp` backed MILP solver.
///
/// microlp is an exact branch-and-bound solver without time-limit or
/// gap knobs, so every successful solve is proven optimal and the
/// limits are accepted for interface compatibility only.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpSolver;

impl MilpSolver {
    /// Creates the bundled solver.
    pub fn new() -> Self {
        Self
    }
}

impl Solver for MilpSolver {
    fn solve(
        &self,
        model: &ScheduleModel,
        _limits: &SolveLimits,
    ) -> Result<SolveOutcome, SolveError> {
        if model.variables.is_empty() {
            // Trivial model from an empty candidate set.
            return Ok(SolveOutcome {
                status: SolveStatus::Optimal,
                values: Vec::new(),
                objective: 0.0,
                gap: Some(0.0),
            });
        }

        let mut vars = ProblemVariables::new();
        let backend_vars: Vec<Variable> = model
            .variables
            .iter()
            .map(|v| match v.domain {
                VarDomain::Binary => vars.add(variable().binary()),
                VarDomain::NonNegativeInteger => vars.add(variable().integer().min(0)),
            })
            .collect();

        let mut objective = Expression::from(0);
        for (v, &backend) in model.variables.iter().zip(&backend_vars) {
            objective += v.objective * backend;
        }

        let mut problem = vars.minimise(objective).using(default_solver);
        for constraint in &model.constraints {
            let mut expr = Expression::from(0);
            for &(var, coefficient) in &constraint.terms {
                expr += coefficient * backend_vars[var];
            }
            let constraint = match constraint.sense {
                ConstraintSense::LessOrEqual => expr.leq(constraint.rhs),
                ConstraintSense::GreaterOrEqual => expr.geq(constraint.rhs),
                ConstraintSense::Equal => good_lp::constraint::eq(expr, constraint.rhs),
            };
            problem = problem.with(constraint);
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = backend_vars.iter().map(|&v| solution.value(v)).collect();
                let objective = model.objective_value(&values);
                debug!("solved to optimality, objective {objective}");
                Ok(SolveOutcome {
                    status: SolveStatus::Optimal,
                    values,
                    objective,
                    gap: Some(0.0),
                })
            }
            Err(ResolutionError::Infeasible) => Ok(SolveOutcome {
                status: SolveStatus::Infeasible,
                values: Vec::new(),
                objective: 0.0,
                gap: None,
            }),
            Err(err) => Err(SolveError::Backend(err.to_string())),
        }
    }
}
