//! Normalized in-memory entity store.
//!
//! Built once from a validated [`RosterData`] bundle. Assigns dense
//! `usize` indexes to employees, jobs, and shifts, expands blocked-time
//! rows to individual intervals, and derives the interval domain as the
//! union of shift coverage and demand cells. Read-only after build.
//!
//! Empty domains (no employees, no shifts, no demand) are legitimate —
//! they produce a trivial but valid model downstream — so they are
//! surfaced as warnings rather than errors.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::RosterData;
use crate::models::{DemandTarget, Employee, ShiftInstance};
use crate::validation::{validate_roster, IntegrityError};

/// A non-fatal empty-domain diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyDomain {
    /// No employees in the bundle.
    Employees,
    /// No shift instances in the bundle.
    Shifts,
    /// No demand cells in the bundle.
    Demand,
}

impl fmt::Display for EmptyDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyDomain::Employees => write!(f, "no employees loaded"),
            EmptyDomain::Shifts => write!(f, "no shift instances loaded"),
            EmptyDomain::Demand => write!(f, "no demand cells loaded"),
        }
    }
}

/// Normalized scheduling entities.
#[derive(Debug, Clone)]
pub struct EntityStore {
    employees: Vec<Employee>,
    jobs: Vec<String>,
    days: Vec<u32>,
    shifts: Vec<ShiftInstance>,
    demand: Vec<DemandTarget>,
    /// Expanded (employee, day, interval) unavailability markers.
    blocked: Vec<(usize, u32, u32)>,
    /// Sorted distinct interval domain (shift coverage ∪ demand cells).
    intervals: Vec<u32>,
    skills: HashSet<(usize, usize)>,
    employee_index: HashMap<String, usize>,
    job_index: HashMap<String, usize>,
    warnings: Vec<EmptyDomain>,
}

impl EntityStore {
    /// Builds the store from a row bundle.
    ///
    /// Runs integrity validation first; any [`IntegrityError`] aborts the
    /// build. Empty-domain conditions are recorded in [`warnings`] and
    /// logged, never raised.
    ///
    /// [`warnings`]: EntityStore::warnings
    pub fn build(data: &RosterData) -> Result<Self, Vec<IntegrityError>> {
        validate_roster(data)?;

        let jobs = data.jobs.clone();
        let job_index: HashMap<String, usize> = jobs
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        let mut days = data.days.clone();
        days.sort_unstable();

        let employees: Vec<Employee> = data
            .employees
            .iter()
            .enumerate()
            .map(|(idx, row)| Employee::new(idx, &row.id, row.wage, row.population.clone()))
            .collect();
        let employee_index: HashMap<String, usize> = employees
            .iter()
            .map(|e| (e.id.clone(), e.index))
            .collect();

        let skills: HashSet<(usize, usize)> = data
            .skills
            .iter()
            .map(|row| (employee_index[&row.employee], job_index[&row.job]))
            .collect();

        let shifts: Vec<ShiftInstance> = data
            .shifts
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                ShiftInstance::new(
                    idx,
                    &row.id,
                    job_index[&row.job],
                    row.day,
                    row.start,
                    row.length,
                    row.unpaid_breaks,
                )
            })
            .collect();

        let demand: Vec<DemandTarget> = data
            .demand
            .iter()
            .map(|row| {
                DemandTarget::new(
                    job_index[&row.job],
                    row.day,
                    row.interval,
                    row.minimum,
                    row.preferred,
                )
            })
            .collect();

        let mut blocked = Vec::new();
        for row in &data.blocked {
            let employee = employee_index[&row.employee];
            for t in row.start..row.end {
                blocked.push((employee, row.day, t));
            }
        }

        // Interval domain: everything any shift covers or any demand
        // cell targets, exclusive-end throughout.
        let mut interval_set: HashSet<u32> = HashSet::new();
        for shift in &shifts {
            interval_set.extend(shift.span());
        }
        for cell in &demand {
            interval_set.insert(cell.interval);
        }
        let mut intervals: Vec<u32> = interval_set.into_iter().collect();
        intervals.sort_unstable();

        let mut warnings = Vec::new();
        if employees.is_empty() {
            warnings.push(EmptyDomain::Employees);
        }
        if shifts.is_empty() {
            warnings.push(EmptyDomain::Shifts);
        }
        if demand.is_empty() {
            warnings.push(EmptyDomain::Demand);
        }
        for warning in &warnings {
            warn!("{warning}");
        }

        Ok(Self {
            employees,
            jobs,
            days,
            shifts,
            demand,
            blocked,
            intervals,
            skills,
            employee_index,
            job_index,
            warnings,
        })
    }

    /// All employees, in arena order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Employee by dense index.
    pub fn employee(&self, index: usize) -> &Employee {
        &self.employees[index]
    }

    /// Declared job names; position is the dense job index.
    pub fn jobs(&self) -> &[String] {
        &self.jobs
    }

    /// Job name by dense index.
    pub fn job_name(&self, job: usize) -> &str {
        &self.jobs[job]
    }

    /// Sorted day domain.
    pub fn days(&self) -> &[u32] {
        &self.days
    }

    /// All shift instances, in arena order.
    pub fn shifts(&self) -> &[ShiftInstance] {
        &self.shifts
    }

    /// Shift instance by dense index.
    pub fn shift(&self, index: usize) -> &ShiftInstance {
        &self.shifts[index]
    }

    /// All demand cells, in input order.
    pub fn demand(&self) -> &[DemandTarget] {
        &self.demand
    }

    /// Expanded (employee, day, interval) unavailability markers.
    pub fn blocked(&self) -> &[(usize, u32, u32)] {
        &self.blocked
    }

    /// Sorted distinct interval domain.
    pub fn intervals(&self) -> &[u32] {
        &self.intervals
    }

    /// One past the largest domain interval (0 when the domain is empty).
    pub fn horizon(&self) -> u32 {
        self.intervals.last().map_or(0, |&t| t + 1)
    }

    /// Whether the employee holds the job skill.
    #[inline]
    pub fn has_skill(&self, employee: usize, job: usize) -> bool {
        self.skills.contains(&(employee, job))
    }

    /// Dense index of an external employee id, if known.
    pub fn employee_index(&self, id: &str) -> Option<usize> {
        self.employee_index.get(id).copied()
    }

    /// Dense index of a job name, if declared.
    pub fn job_id(&self, name: &str) -> Option<usize> {
        self.job_index.get(name).copied()
    }

    /// Empty-domain diagnostics recorded at build.
    pub fn warnings(&self) -> &[EmptyDomain] {
        &self.warnings
    }
}
