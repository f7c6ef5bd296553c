//! Solution interpretation.
//!
//! Turns a raw variable-value vector back into scheduling terms: which
//! fixed shifts are assigned to whom, which flexible blocks are worked,
//! how each demand cell fared, and where the wage and penalty money
//! went. This is the complete contract the export/report layer needs —
//! everything here serializes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::candidates::AssignmentCandidate;
use crate::model::{ScheduleModel, VarKind};
use crate::patterns::FlexiblePattern;
use crate::solve::{SolveOutcome, SolveStatus};
use crate::store::EntityStore;

/// A fixed shift instance assigned to an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAssignment {
    pub employee: String,
    pub shift: String,
    pub job: String,
    pub day: u32,
    pub start: u32,
    pub paid_intervals: u32,
    pub unpaid_intervals: u32,
}

/// A flexible pattern worked by an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAssignment {
    pub employee: String,
    pub job: String,
    pub day: u32,
    pub start: u32,
    pub length: u32,
}

/// Realized staffing at one demand cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageCell {
    pub job: String,
    pub day: u32,
    pub interval: u32,
    /// Headcount actually covering the cell.
    pub assigned: u32,
    pub minimum: u32,
    pub preferred: u32,
    pub slack_min: u32,
    pub slack_pref: u32,
}

/// Where the objective value came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Wage paid to fixed-shift assignments.
    pub fixed_wage: f64,
    /// Wage paid to flexible patterns.
    pub pattern_wage: f64,
    /// Penalty incurred for unmet minimum demand.
    pub penalty_min: f64,
    /// Penalty incurred for unmet preferred demand.
    pub penalty_pref: f64,
    pub total: f64,
}

/// One row of the merged assignment view, fixed and flexible together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub employee: String,
    pub source: AssignmentSource,
    /// Shift id for fixed assignments, absent for patterns.
    pub shift: Option<String>,
    pub job: String,
    pub day: u32,
    pub start: u32,
    pub length: u32,
    pub unpaid_intervals: u32,
}

/// Origin of an assignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentSource {
    Fixed,
    Flexible,
}

/// A fully interpreted schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedSchedule {
    /// How the solver terminated. Anything other than
    /// [`SolveStatus::Optimal`] means usable-but-not-proven-optimal.
    pub status: SolveStatus,
    pub objective: f64,
    /// Relative optimality gap, when the backend reports one.
    pub gap: Option<f64>,
    pub fixed: Vec<FixedAssignment>,
    pub flexible: Vec<PatternAssignment>,
    /// One row per demand cell, in input order.
    pub coverage: Vec<CoverageCell>,
    pub breakdown: CostBreakdown,
}

impl SolvedSchedule {
    /// Interprets a usable solve outcome.
    ///
    /// `outcome` must carry one value per model variable (i.e. its
    /// status is not infeasible); the planner guarantees this.
    pub fn interpret(
        model: &ScheduleModel,
        store: &EntityStore,
        candidates: &[AssignmentCandidate],
        patterns: &[FlexiblePattern],
        outcome: &SolveOutcome,
    ) -> Self {
        let chosen = |var: usize| outcome.values[var] > 0.5;

        let mut fixed = Vec::new();
        let mut assigned: HashMap<(usize, u32, u32), u32> = HashMap::new();
        for (ci, c) in candidates.iter().enumerate() {
            if !chosen(model.assignment_vars[ci]) {
                continue;
            }
            let shift = store.shift(c.shift);
            for t in shift.span() {
                *assigned.entry((shift.job, c.day, t)).or_default() += 1;
            }
            fixed.push(FixedAssignment {
                employee: store.employee(c.employee).id.clone(),
                shift: shift.id.clone(),
                job: store.job_name(shift.job).to_string(),
                day: c.day,
                start: shift.start,
                paid_intervals: shift.paid_intervals(),
                unpaid_intervals: shift.unpaid_breaks,
            });
        }

        let mut flexible = Vec::new();
        for (pi, p) in patterns.iter().enumerate() {
            if !chosen(model.pattern_vars[pi]) {
                continue;
            }
            for t in p.span() {
                *assigned.entry((p.job, p.day, t)).or_default() += 1;
            }
            flexible.push(PatternAssignment {
                employee: store.employee(p.employee).id.clone(),
                job: store.job_name(p.job).to_string(),
                day: p.day,
                start: p.start,
                length: p.length,
            });
        }

        let round = |value: f64| value.round().max(0.0) as u32;
        let coverage: Vec<CoverageCell> = model
            .cells
            .iter()
            .enumerate()
            .map(|(cell_idx, cell)| CoverageCell {
                job: store.job_name(cell.job).to_string(),
                day: cell.day,
                interval: cell.interval,
                assigned: assigned.get(&cell.cell()).copied().unwrap_or(0),
                minimum: cell.minimum,
                preferred: cell.preferred,
                slack_min: round(outcome.values[model.slack_min_vars[cell_idx]]),
                slack_pref: round(outcome.values[model.slack_pref_vars[cell_idx]]),
            })
            .collect();

        let mut breakdown = CostBreakdown::default();
        for (variable, &value) in model.variables.iter().zip(&outcome.values) {
            let contribution = variable.objective * value;
            match variable.kind {
                VarKind::Assignment(_) => breakdown.fixed_wage += contribution,
                VarKind::Pattern(_) => breakdown.pattern_wage += contribution,
                VarKind::SlackMin(_) => breakdown.penalty_min += contribution,
                VarKind::SlackPref(_) => breakdown.penalty_pref += contribution,
            }
        }
        breakdown.total = breakdown.fixed_wage
            + breakdown.pattern_wage
            + breakdown.penalty_min
            + breakdown.penalty_pref;

        Self {
            status: outcome.status,
            objective: outcome.objective,
            gap: outcome.gap,
            fixed,
            flexible,
            coverage,
            breakdown,
        }
    }

    /// Whether optimality was proven.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Demand cells with unmet minimum staffing, worst first (by
    /// missing headcount, then day, then interval).
    pub fn hotspots(&self) -> Vec<&CoverageCell> {
        let mut cells: Vec<&CoverageCell> = self
            .coverage
            .iter()
            .filter(|c| c.slack_min > 0)
            .collect();
        cells.sort_by_key(|c| (std::cmp::Reverse(c.slack_min), c.day, c.interval));
        cells
    }

    /// Merged fixed + flexible assignment rows for export.
    pub fn records(&self) -> Vec<AssignmentRecord> {
        let mut records: Vec<AssignmentRecord> = self
            .fixed
            .iter()
            .map(|a| AssignmentRecord {
                employee: a.employee.clone(),
                source: AssignmentSource::Fixed,
                shift: Some(a.shift.clone()),
                job: a.job.clone(),
                day: a.day,
                start: a.start,
                length: a.paid_intervals + a.unpaid_intervals,
                unpaid_intervals: a.unpaid_intervals,
            })
            .collect();
        records.extend(self.flexible.iter().map(|p| AssignmentRecord {
            employee: p.employee.clone(),
            source: AssignmentSource::Flexible,
            shift: None,
            job: p.job.clone(),
            day: p.day,
            start: p.start,
            length: p.length,
            unpaid_intervals: 0,
        }));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::generate_candidates;
    use crate::coverage::CoverageIndex;
    use crate::data::{DemandRow, EmployeeRow, RosterData, ShiftRow, SkillRow};
    use crate::model::{ModelConfig, ScheduleModelBuilder};
    use crate::models::Population;
    use crate::patterns::{generate_patterns, PatternConfig};

    fn sample() -> (
        EntityStore,
        ScheduleModel,
        Vec<AssignmentCandidate>,
        Vec<FlexiblePattern>,
    ) {
        let data = RosterData {
            jobs: vec!["cashier".into()],
            days: vec![1],
            employees: vec![
                EmployeeRow {
                    id: "E1".into(),
                    wage: 20.0,
                    population: Population::FullTime,
                },
                EmployeeRow {
                    id: "P1".into(),
                    wage: 16.0,
                    population: Population::part_time("PT20"),
                },
            ],
            skills: vec![
                SkillRow {
                    employee: "E1".into(),
                    job: "cashier".into(),
                },
                SkillRow {
                    employee: "P1".into(),
                    job: "cashier".into(),
                },
            ],
            shifts: vec![ShiftRow {
                id: "S1".into(),
                job: "cashier".into(),
                day: 1,
                start: 10,
                length: 4,
                unpaid_breaks: 1,
            }],
            blocked: vec![],
            demand: (10..14)
                .map(|t| DemandRow {
                    job: "cashier".into(),
                    day: 1,
                    interval: t,
                    minimum: 1,
                    preferred: 2,
                })
                .collect(),
        };
        let store = EntityStore::build(&data).unwrap();
        let coverage = CoverageIndex::build(&store);
        let config = ModelConfig::default();
        let candidates = generate_candidates(&store, &coverage);
        let patterns = generate_patterns(
            &store,
            &coverage,
            &PatternConfig::new([4]).with_start_window(10, 10),
            config.unit_time,
        )
        .unwrap();
        let model = ScheduleModelBuilder::new(&store, &coverage, &candidates, &patterns, &config)
            .build()
            .unwrap();
        (store, model, candidates, patterns)
    }

    /// Hand-crafted outcome: E1 takes the shift, P1's pattern unused,
    /// preferred shortfall of 1 everywhere.
    fn outcome_for(model: &ScheduleModel) -> SolveOutcome {
        let mut values = vec![0.0; model.variables.len()];
        values[model.assignment_vars[0]] = 1.0;
        for &v in &model.slack_pref_vars {
            values[v] = 1.0;
        }
        SolveOutcome {
            status: SolveStatus::Optimal,
            objective: 0.0,
            values,
            gap: Some(0.0),
        }
    }

    #[test]
    fn test_interprets_fixed_assignment() {
        let (store, model, candidates, patterns) = sample();
        let outcome = outcome_for(&model);
        let schedule =
            SolvedSchedule::interpret(&model, &store, &candidates, &patterns, &outcome);

        assert_eq!(schedule.fixed.len(), 1);
        let a = &schedule.fixed[0];
        assert_eq!(a.employee, "E1");
        assert_eq!(a.shift, "S1");
        assert_eq!(a.paid_intervals, 3);
        assert_eq!(a.unpaid_intervals, 1);
        assert!(schedule.flexible.is_empty());
        assert!(schedule.is_optimal());
    }

    #[test]
    fn test_coverage_counts_and_slacks() {
        let (store, model, candidates, patterns) = sample();
        let outcome = outcome_for(&model);
        let schedule =
            SolvedSchedule::interpret(&model, &store, &candidates, &patterns, &outcome);

        assert_eq!(schedule.coverage.len(), 4);
        for cell in &schedule.coverage {
            assert_eq!(cell.assigned, 1);
            assert_eq!(cell.slack_min, 0);
            assert_eq!(cell.slack_pref, 1);
            // assigned + slack_pref ≥ preferred holds.
            assert!(cell.assigned + cell.slack_pref >= cell.preferred);
        }
        // No unmet minimum anywhere.
        assert!(schedule.hotspots().is_empty());
    }

    #[test]
    fn test_cost_breakdown_buckets() {
        let (store, model, candidates, patterns) = sample();
        let outcome = outcome_for(&model);
        let schedule =
            SolvedSchedule::interpret(&model, &store, &candidates, &patterns, &outcome);

        // 20 × 0.5 × 3 paid intervals.
        assert!((schedule.breakdown.fixed_wage - 30.0).abs() < 1e-9);
        assert_eq!(schedule.breakdown.pattern_wage, 0.0);
        assert_eq!(schedule.breakdown.penalty_min, 0.0);
        // 4 cells × penalty_pref 10.
        assert!((schedule.breakdown.penalty_pref - 40.0).abs() < 1e-9);
        assert!((schedule.breakdown.total - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_merged_records_view() {
        let (store, model, candidates, patterns) = sample();
        let mut outcome = outcome_for(&model);
        outcome.values[model.pattern_vars[0]] = 1.0;
        let schedule =
            SolvedSchedule::interpret(&model, &store, &candidates, &patterns, &outcome);

        let records = schedule.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, AssignmentSource::Fixed);
        assert_eq!(records[0].shift.as_deref(), Some("S1"));
        assert_eq!(records[1].source, AssignmentSource::Flexible);
        assert_eq!(records[1].shift, None);
        assert_eq!(records[1].length, 4);
    }

    #[test]
    fn test_schedule_serializes() {
        let (store, model, candidates, patterns) = sample();
        let outcome = outcome_for(&model);
        let schedule =
            SolvedSchedule::interpret(&model, &store, &candidates, &patterns, &outcome);

        let json = serde_json::to_string(&schedule).unwrap();
        let back: SolvedSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }
}
