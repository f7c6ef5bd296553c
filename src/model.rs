//! Solver-agnostic model assembly.
//!
//! Translates the candidate and pattern sets into a complete mixed
//! integer program: decision variables, a linear minimization objective,
//! and linear constraints. The description is backend-neutral — any
//! MILP solver can consume it through the [`Solver`] trait.
//!
//! Variables exist *only* for feasible candidates and patterns; skill
//! and availability admissibility is enforced by omission from those
//! sets, not by inequalities. Staffing demand is soft: shortfall flows
//! into penalized slack variables, so the assembled program always has a
//! feasible solution.
//!
//! [`Solver`]: crate::solve::Solver

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candidates::AssignmentCandidate;
use crate::coverage::CoverageIndex;
use crate::models::DemandTarget;
use crate::patterns::FlexiblePattern;
use crate::store::EntityStore;

/// A configuration defect, detected before any assembly work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("penalty ordering violated: require penalty_min > penalty_pref > 0, got {penalty_min} and {penalty_pref}")]
    PenaltyOrder { penalty_min: f64, penalty_pref: f64 },
    #[error("unit time must be positive, got {0}")]
    NonPositiveUnitTime(f64),
    #[error("allowed-length catalog is empty")]
    EmptyLengthCatalog,
    #[error("allowed-length catalog contains a zero length")]
    ZeroPatternLength,
    #[error("start window [{lo}, {hi}] is inverted")]
    InvertedStartWindow { lo: u32, hi: u32 },
}

/// Cost and penalty configuration.
///
/// `unit_time` converts interval counts into wage units (e.g. 0.5 for a
/// 30-minute grid with hourly wages). The penalty weights price demand
/// shortfall: `penalty_min` must dominate `penalty_pref`, and both
/// should dominate any achievable per-interval wage cost so the solver
/// always prefers covering minimum demand over saving wage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Time units per interval.
    pub unit_time: f64,
    /// Penalty per unit of unmet minimum demand.
    pub penalty_min: f64,
    /// Penalty per unit of unmet preferred demand.
    pub penalty_pref: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            unit_time: 0.5,
            penalty_min: 1.0e7,
            penalty_pref: 10.0,
        }
    }
}

impl ModelConfig {
    /// Sets the time units per interval.
    pub fn with_unit_time(mut self, unit_time: f64) -> Self {
        self.unit_time = unit_time;
        self
    }

    /// Sets both penalty weights.
    pub fn with_penalties(mut self, penalty_min: f64, penalty_pref: f64) -> Self {
        self.penalty_min = penalty_min;
        self.penalty_pref = penalty_pref;
        self
    }

    /// Checks `penalty_min > penalty_pref > 0` and `unit_time > 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_time <= 0.0 {
            return Err(ConfigError::NonPositiveUnitTime(self.unit_time));
        }
        if !(self.penalty_min > self.penalty_pref && self.penalty_pref > 0.0) {
            return Err(ConfigError::PenaltyOrder {
                penalty_min: self.penalty_min,
                penalty_pref: self.penalty_pref,
            });
        }
        Ok(())
    }
}

/// Variable value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarDomain {
    /// {0, 1}.
    Binary,
    /// Integer ≥ 0. Headcount shortfall is inherently integral.
    NonNegativeInteger,
}

/// What a decision variable decides.
///
/// Payloads are dense indexes into the candidate list, pattern list, or
/// demand-cell list captured in the [`ScheduleModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Fixed-shift assignment x\[i,j,d\] for candidate `.0`.
    Assignment(usize),
    /// Pattern usage y\[p\] for pattern `.0`.
    Pattern(usize),
    /// Minimum-demand shortfall for demand cell `.0`.
    SlackMin(usize),
    /// Preferred-demand shortfall for demand cell `.0`.
    SlackPref(usize),
}

/// One decision variable with its objective coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelVariable {
    pub kind: VarKind,
    pub domain: VarDomain,
    /// Coefficient in the minimization objective.
    pub objective: f64,
}

/// Comparison direction of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

/// A linear constraint: Σ coefficient·variable ⟨sense⟩ rhs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// (variable index, coefficient) pairs.
    pub terms: Vec<(usize, f64)>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

/// The assembled solver-agnostic program.
///
/// Built once per solve and discarded after interpretation. The
/// `*_vars` vectors map candidate / pattern / demand-cell indexes to
/// variable indexes for solution interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleModel {
    pub variables: Vec<ModelVariable>,
    pub constraints: Vec<LinearConstraint>,
    /// Demand cells, in the store's input order.
    pub cells: Vec<DemandTarget>,
    /// Variable index of x for each candidate.
    pub assignment_vars: Vec<usize>,
    /// Variable index of y for each pattern.
    pub pattern_vars: Vec<usize>,
    /// Variable index of slack_min for each demand cell.
    pub slack_min_vars: Vec<usize>,
    /// Variable index of slack_pref for each demand cell.
    pub slack_pref_vars: Vec<usize>,
}

impl ScheduleModel {
    /// Objective value of a variable-value assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(v, value)| v.objective * value)
            .sum()
    }
}

/// Assembles a [`ScheduleModel`] from generated candidates and patterns.
///
/// Stateless per invocation: borrow the inputs, call [`build`], drop
/// the builder.
///
/// [`build`]: ScheduleModelBuilder::build
pub struct ScheduleModelBuilder<'a> {
    store: &'a EntityStore,
    coverage: &'a CoverageIndex,
    candidates: &'a [AssignmentCandidate],
    patterns: &'a [FlexiblePattern],
    config: &'a ModelConfig,
}

impl<'a> ScheduleModelBuilder<'a> {
    /// Creates a builder over borrowed generation output.
    pub fn new(
        store: &'a EntityStore,
        coverage: &'a CoverageIndex,
        candidates: &'a [AssignmentCandidate],
        patterns: &'a [FlexiblePattern],
        config: &'a ModelConfig,
    ) -> Self {
        Self {
            store,
            coverage,
            candidates,
            patterns,
            config,
        }
    }

    /// Builds the program.
    ///
    /// Emits, in order:
    /// 1. binary x per candidate, binary y per pattern, integer slack
    ///    pair per demand cell;
    /// 2. one-shift-per-day constraints for every (employee, day) pair
    ///    that has at least one variable (pairs without any are absent,
    ///    never vacuous);
    /// 3. per demand cell: assigned + slack_min ≥ minimum and
    ///    assigned + slack_pref ≥ preferred, where assigned sums every
    ///    x and y whose coverage touches the cell.
    pub fn build(&self) -> Result<ScheduleModel, ConfigError> {
        self.config.validate()?;
        self.check_penalty_dominance();

        let mut variables = Vec::with_capacity(
            self.candidates.len() + self.patterns.len() + 2 * self.store.demand().len(),
        );

        let assignment_vars: Vec<usize> = self
            .candidates
            .iter()
            .enumerate()
            .map(|(ci, c)| {
                let shift = self.store.shift(c.shift);
                let wage = self.store.employee(c.employee).wage;
                let var = variables.len();
                variables.push(ModelVariable {
                    kind: VarKind::Assignment(ci),
                    domain: VarDomain::Binary,
                    objective: wage * self.config.unit_time * f64::from(shift.paid_intervals()),
                });
                var
            })
            .collect();

        let pattern_vars: Vec<usize> = self
            .patterns
            .iter()
            .enumerate()
            .map(|(pi, p)| {
                let var = variables.len();
                variables.push(ModelVariable {
                    kind: VarKind::Pattern(pi),
                    domain: VarDomain::Binary,
                    objective: p.cost,
                });
                var
            })
            .collect();

        let cells: Vec<DemandTarget> = self.store.demand().to_vec();
        let mut slack_min_vars = Vec::with_capacity(cells.len());
        let mut slack_pref_vars = Vec::with_capacity(cells.len());
        for cell_idx in 0..cells.len() {
            slack_min_vars.push(variables.len());
            variables.push(ModelVariable {
                kind: VarKind::SlackMin(cell_idx),
                domain: VarDomain::NonNegativeInteger,
                objective: self.config.penalty_min,
            });
            slack_pref_vars.push(variables.len());
            variables.push(ModelVariable {
                kind: VarKind::SlackPref(cell_idx),
                domain: VarDomain::NonNegativeInteger,
                objective: self.config.penalty_pref,
            });
        }

        let mut constraints = Vec::new();

        // One assignment per employee per day, fixed and flexible
        // together. BTreeMap keeps constraint order deterministic.
        let mut per_day: BTreeMap<(usize, u32), Vec<usize>> = BTreeMap::new();
        for (ci, c) in self.candidates.iter().enumerate() {
            per_day
                .entry((c.employee, c.day))
                .or_default()
                .push(assignment_vars[ci]);
        }
        for (pi, p) in self.patterns.iter().enumerate() {
            per_day
                .entry((p.employee, p.day))
                .or_default()
                .push(pattern_vars[pi]);
        }
        for vars in per_day.into_values() {
            constraints.push(LinearConstraint {
                terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
                sense: ConstraintSense::LessOrEqual,
                rhs: 1.0,
            });
        }

        // Coverage aggregation per demand cell.
        let cell_index: HashMap<(usize, u32, u32), usize> = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (cell.cell(), idx))
            .collect();
        let mut cell_terms: Vec<Vec<(usize, f64)>> = vec![Vec::new(); cells.len()];
        for (ci, c) in self.candidates.iter().enumerate() {
            let job = self.store.shift(c.shift).job;
            for &t in self.coverage.covered_intervals(c.shift) {
                if let Some(&cell) = cell_index.get(&(job, c.day, t)) {
                    cell_terms[cell].push((assignment_vars[ci], 1.0));
                }
            }
        }
        for (pi, p) in self.patterns.iter().enumerate() {
            for t in p.span() {
                if let Some(&cell) = cell_index.get(&(p.job, p.day, t)) {
                    cell_terms[cell].push((pattern_vars[pi], 1.0));
                }
            }
        }

        for (cell_idx, cell) in cells.iter().enumerate() {
            let assigned = &cell_terms[cell_idx];

            let mut min_terms = assigned.clone();
            min_terms.push((slack_min_vars[cell_idx], 1.0));
            constraints.push(LinearConstraint {
                terms: min_terms,
                sense: ConstraintSense::GreaterOrEqual,
                rhs: f64::from(cell.minimum),
            });

            let mut pref_terms = assigned.clone();
            pref_terms.push((slack_pref_vars[cell_idx], 1.0));
            constraints.push(LinearConstraint {
                terms: pref_terms,
                sense: ConstraintSense::GreaterOrEqual,
                rhs: f64::from(cell.preferred),
            });
        }

        debug!(
            "assembled model: {} variables, {} constraints, {} demand cells",
            variables.len(),
            constraints.len(),
            cells.len()
        );

        Ok(ScheduleModel {
            variables,
            constraints,
            cells,
            assignment_vars,
            pattern_vars,
            slack_min_vars,
            slack_pref_vars,
        })
    }

    /// Warns when the penalty weights fail to dominate the most
    /// expensive single covered interval. The solver would then prefer
    /// leaving demand unmet over paying wages.
    fn check_penalty_dominance(&self) {
        let max_interval_cost = self
            .store
            .employees()
            .iter()
            .map(|e| e.wage * self.config.unit_time)
            .fold(0.0, f64::max);
        if self.config.penalty_pref <= max_interval_cost {
            warn!(
                "penalty_pref {} does not dominate the max per-interval wage cost {}",
                self.config.penalty_pref, max_interval_cost
            );
        }
    }
}
