//! End-to-end planning pipeline.
//!
//! Wires the stages in data-flow order: validate and normalize rows,
//! build the coverage index, generate fixed candidates and flexible
//! patterns, assemble the program, solve, interpret.
//!
//! Error policy (matching the stage that owns each condition):
//! - integrity defects abort before any model construction;
//! - empty domains and availability filtered down to nothing are
//!   warnings — a trivial schedule is still produced;
//! - a solver time-limit/gap stop yields a usable schedule labeled
//!   non-optimal via its status;
//! - an infeasible status is a fatal assembly defect: slack variables
//!   make minimum staffing always satisfiable, so a correctly built
//!   model cannot be infeasible.

use log::warn;
use thiserror::Error;

use crate::candidates::generate_candidates;
use crate::coverage::CoverageIndex;
use crate::data::RosterData;
use crate::model::{ConfigError, ModelConfig, ScheduleModelBuilder};
use crate::patterns::{generate_patterns, PatternConfig};
use crate::report::SolvedSchedule;
use crate::solve::{SolveError, SolveLimits, SolveStatus, Solver};
use crate::store::EntityStore;
use crate::validation::IntegrityError;

/// A planning-run failure.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("input failed integrity validation ({} error(s))", .0.len())]
    Integrity(Vec<IntegrityError>),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("solver reported the assembled model infeasible; slack variables should make minimum staffing always satisfiable")]
    InfeasibleModel,
}

/// Configured scheduling pipeline.
///
/// Stateless across runs: every [`plan`] call rebuilds all derived
/// structures from the given rows.
///
/// [`plan`]: Planner::plan
#[derive(Debug, Clone, Default)]
pub struct Planner {
    model_config: ModelConfig,
    pattern_config: PatternConfig,
}

impl Planner {
    /// Creates a planner with default cost and pattern configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cost and penalty configuration.
    pub fn with_model_config(mut self, config: ModelConfig) -> Self {
        self.model_config = config;
        self
    }

    /// Sets the flexible-pattern configuration.
    pub fn with_pattern_config(mut self, config: PatternConfig) -> Self {
        self.pattern_config = config;
        self
    }

    /// Runs one full planning pass.
    pub fn plan<S: Solver>(
        &self,
        data: &RosterData,
        solver: &S,
        limits: &SolveLimits,
    ) -> Result<SolvedSchedule, PlanError> {
        let store = EntityStore::build(data).map_err(PlanError::Integrity)?;
        let coverage = CoverageIndex::build(&store);

        let candidates = generate_candidates(&store, &coverage);
        let patterns = generate_patterns(
            &store,
            &coverage,
            &self.pattern_config,
            self.model_config.unit_time,
        )?;
        if candidates.is_empty() && patterns.is_empty() && !store.demand().is_empty() {
            warn!("no feasible candidates or patterns; demand can only be met by slack");
        }

        let model =
            ScheduleModelBuilder::new(&store, &coverage, &candidates, &patterns, &self.model_config)
                .build()?;

        let outcome = solver.solve(&model, limits)?;
        if outcome.status == SolveStatus::Infeasible {
            return Err(PlanError::InfeasibleModel);
        }

        Ok(SolvedSchedule::interpret(
            &model,
            &store,
            &candidates,
            &patterns,
            &outcome,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BlockedRow, DemandRow, EmployeeRow, ShiftRow, SkillRow};
    use crate::models::Population;
    use crate::solve::MilpSolver;

    /// One cashier, one cashier shift [10, 14) on day 1, demand
    /// min = pref = 1 across the span.
    fn single_shift_data() -> RosterData {
        RosterData {
            jobs: vec!["cashier".into()],
            days: vec![1],
            employees: vec![EmployeeRow {
                id: "E1".into(),
                wage: 20.0,
                population: Population::FullTime,
            }],
            skills: vec![SkillRow {
                employee: "E1".into(),
                job: "cashier".into(),
            }],
            shifts: vec![ShiftRow {
                id: "S1".into(),
                job: "cashier".into(),
                day: 1,
                start: 10,
                length: 4,
                unpaid_breaks: 0,
            }],
            blocked: vec![],
            demand: (10..14)
                .map(|t| DemandRow {
                    job: "cashier".into(),
                    day: 1,
                    interval: t,
                    minimum: 1,
                    preferred: 1,
                })
                .collect(),
        }
    }

    fn plan(data: &RosterData) -> SolvedSchedule {
        Planner::new()
            .plan(data, &MilpSolver::new(), &SolveLimits::none())
            .unwrap()
    }

    #[test]
    fn test_single_candidate_is_assigned() {
        let schedule = plan(&single_shift_data());

        assert!(schedule.is_optimal());
        assert_eq!(schedule.fixed.len(), 1);
        assert_eq!(schedule.fixed[0].employee, "E1");
        assert!(schedule.coverage.iter().all(|c| c.slack_min == 0));
        assert!(schedule.coverage.iter().all(|c| c.assigned == 1));
        // Objective is pure wage: 20 × 0.5 × 4 intervals.
        assert!((schedule.objective - 40.0).abs() < 1e-6);
        assert!((schedule.breakdown.penalty_min).abs() < 1e-6);
    }

    #[test]
    fn test_fully_blocked_employee_leaves_shortfall() {
        let mut data = single_shift_data();
        data.blocked.push(BlockedRow {
            employee: "E1".into(),
            day: 1,
            start: 10,
            end: 14,
        });
        let schedule = plan(&data);

        assert!(schedule.fixed.is_empty());
        for cell in &schedule.coverage {
            assert_eq!(cell.assigned, 0);
            assert_eq!(cell.slack_min, cell.minimum);
        }
        let hotspots = schedule.hotspots();
        assert_eq!(hotspots.len(), 4);
        assert!(schedule.breakdown.penalty_min > 0.0);
    }

    #[test]
    fn test_flexible_pattern_covers_demand() {
        let mut data = single_shift_data();
        data.shifts.clear();
        data.employees[0].population = Population::part_time("PT20");

        let schedule = Planner::new()
            .with_pattern_config(PatternConfig::new([4]).with_start_window(10, 10))
            .plan(&data, &MilpSolver::new(), &SolveLimits::none())
            .unwrap();

        assert_eq!(schedule.flexible.len(), 1);
        let p = &schedule.flexible[0];
        assert_eq!((p.start, p.length), (10, 4));
        assert!(schedule.coverage.iter().all(|c| c.slack_min == 0));
    }

    #[test]
    fn test_one_shift_per_day_is_enforced() {
        let mut data = single_shift_data();
        data.shifts.push(ShiftRow {
            id: "S2".into(),
            job: "cashier".into(),
            day: 1,
            start: 10,
            length: 4,
            unpaid_breaks: 0,
        });
        // Two heads demanded, but a single employee can take only one
        // shift per day.
        for cell in &mut data.demand {
            cell.minimum = 2;
            cell.preferred = 2;
        }
        let schedule = plan(&data);

        assert_eq!(schedule.fixed.len(), 1);
        for cell in &schedule.coverage {
            assert_eq!(cell.assigned, 1);
            assert_eq!(cell.slack_min, 1);
        }
    }

    #[test]
    fn test_minimum_increase_never_cheapens_schedule() {
        let base = plan(&single_shift_data());

        let mut raised = single_shift_data();
        raised.demand[0].minimum = 2;
        raised.demand[0].preferred = 2;
        let harder = plan(&raised);

        assert!(harder.objective >= base.objective - 1e-6);
        // The extra head is unavailable, so the raise costs a penalty.
        assert!(harder.objective > base.objective);
    }

    #[test]
    fn test_empty_rows_produce_trivial_schedule() {
        let schedule = plan(&RosterData::new());

        assert!(schedule.is_optimal());
        assert!(schedule.fixed.is_empty());
        assert!(schedule.flexible.is_empty());
        assert!(schedule.coverage.is_empty());
        assert_eq!(schedule.objective, 0.0);
    }

    #[test]
    fn test_integrity_errors_abort_planning() {
        let mut data = single_shift_data();
        data.shifts[0].job = "barista".into();

        let err = Planner::new()
            .plan(&data, &MilpSolver::new(), &SolveLimits::none())
            .unwrap_err();
        assert!(matches!(err, PlanError::Integrity(_)));
    }

    #[test]
    fn test_invalid_penalties_abort_planning() {
        let planner =
            Planner::new().with_model_config(ModelConfig::default().with_penalties(1.0, 5.0));
        let err = planner
            .plan(&single_shift_data(), &MilpSolver::new(), &SolveLimits::none())
            .unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }

    #[test]
    fn test_mixed_population_prefers_cheaper_coverage() {
        // A part-time employee at half the wage competes with E1 for the
        // same demand; the cheaper head must serve it, whether through
        // the fixed shift or an equally priced pattern.
        let mut data = single_shift_data();
        data.employees.push(EmployeeRow {
            id: "P1".into(),
            wage: 10.0,
            population: Population::part_time("PT20"),
        });
        data.skills.push(SkillRow {
            employee: "P1".into(),
            job: "cashier".into(),
        });

        let schedule = Planner::new()
            .with_pattern_config(PatternConfig::new([4]).with_start_window(10, 10))
            .plan(&data, &MilpSolver::new(), &SolveLimits::none())
            .unwrap();

        let records = schedule.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee, "P1");
        assert!(schedule.coverage.iter().all(|c| c.slack_min == 0));
        // 10 × 0.5 × 4 = 20 < 40 for E1 on the same span.
        assert!((schedule.objective - 20.0).abs() < 1e-6);
    }
}
