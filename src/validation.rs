//! Input integrity checks.
//!
//! Validates a [`RosterData`] bundle before the entity store normalizes
//! it. Detects:
//! - Duplicate employee, shift, or declared-domain identifiers
//! - References to undeclared jobs, days, or unknown employees
//! - Malformed rows (negative wage, zero-length shifts, spans
//!   overflowing the interval index range, breaks longer than the
//!   shift, minimum demand above preferred)
//!
//! Integrity errors are fatal: the store refuses to build from a bundle
//! that fails any check. Empty domains are *not* integrity errors — they
//! are surfaced as warnings by the store (a trivial model is still a
//! valid model).

use std::collections::HashSet;

use thiserror::Error;

use crate::data::RosterData;

/// Validation outcome: all errors found, not just the first.
pub type ValidationResult = Result<(), Vec<IntegrityError>>;

/// A fatal defect in the input data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityError {
    #[error("duplicate employee id {0:?}")]
    DuplicateEmployee(String),
    #[error("duplicate shift id {0:?}")]
    DuplicateShift(String),
    #[error("duplicate declared job {0:?}")]
    DuplicateJob(String),
    #[error("duplicate declared day {0}")]
    DuplicateDay(u32),
    #[error("employee {0:?} has negative wage {1}")]
    NegativeWage(String, f64),
    #[error("skill row references unknown employee {0:?}")]
    UnknownSkillEmployee(String),
    #[error("skill row for employee {employee:?} references undeclared job {job:?}")]
    UnknownSkillJob { employee: String, job: String },
    #[error("shift {shift:?} references undeclared job {job:?}")]
    UnknownShiftJob { shift: String, job: String },
    #[error("shift {shift:?} references undeclared day {day}")]
    UnknownShiftDay { shift: String, day: u32 },
    #[error("shift {0:?} has zero length")]
    EmptyShift(String),
    #[error("shift {shift:?} span starting at {start} with length {length} overflows the interval index range")]
    ShiftSpanOverflow {
        shift: String,
        start: u32,
        length: u32,
    },
    #[error("shift {shift:?} has unpaid breaks {unpaid} exceeding length {length}")]
    BreaksExceedLength {
        shift: String,
        unpaid: u32,
        length: u32,
    },
    #[error("blocked row references unknown employee {0:?}")]
    UnknownBlockedEmployee(String),
    #[error("blocked row for employee {employee:?} references undeclared day {day}")]
    UnknownBlockedDay { employee: String, day: u32 },
    #[error("blocked row for employee {employee:?} has empty range [{start}, {end})")]
    EmptyBlockedRange {
        employee: String,
        start: u32,
        end: u32,
    },
    #[error("demand row references undeclared job {0:?}")]
    UnknownDemandJob(String),
    #[error("demand row for job {job:?} references undeclared day {day}")]
    UnknownDemandDay { job: String, day: u32 },
    #[error("demand for ({job:?}, day {day}, t {interval}) has minimum {minimum} above preferred {preferred}")]
    MinimumAbovePreferred {
        job: String,
        day: u32,
        interval: u32,
        minimum: u32,
        preferred: u32,
    },
    #[error("duplicate demand cell ({job:?}, day {day}, t {interval})")]
    DuplicateDemandCell { job: String, day: u32, interval: u32 },
}

/// Validates a roster bundle.
///
/// Returns every integrity error found. An `Ok(())` result guarantees
/// that entity-store normalization cannot encounter a dangling
/// reference.
pub fn validate_roster(data: &RosterData) -> ValidationResult {
    let mut errors = Vec::new();

    let mut jobs = HashSet::new();
    for job in &data.jobs {
        if !jobs.insert(job.as_str()) {
            errors.push(IntegrityError::DuplicateJob(job.clone()));
        }
    }
    let mut days = HashSet::new();
    for &day in &data.days {
        if !days.insert(day) {
            errors.push(IntegrityError::DuplicateDay(day));
        }
    }

    let mut employees = HashSet::new();
    for row in &data.employees {
        if !employees.insert(row.id.as_str()) {
            errors.push(IntegrityError::DuplicateEmployee(row.id.clone()));
        }
        if row.wage < 0.0 {
            errors.push(IntegrityError::NegativeWage(row.id.clone(), row.wage));
        }
    }

    for row in &data.skills {
        if !employees.contains(row.employee.as_str()) {
            errors.push(IntegrityError::UnknownSkillEmployee(row.employee.clone()));
        }
        if !jobs.contains(row.job.as_str()) {
            errors.push(IntegrityError::UnknownSkillJob {
                employee: row.employee.clone(),
                job: row.job.clone(),
            });
        }
    }

    let mut shifts = HashSet::new();
    for row in &data.shifts {
        if !shifts.insert(row.id.as_str()) {
            errors.push(IntegrityError::DuplicateShift(row.id.clone()));
        }
        if !jobs.contains(row.job.as_str()) {
            errors.push(IntegrityError::UnknownShiftJob {
                shift: row.id.clone(),
                job: row.job.clone(),
            });
        }
        if !days.contains(&row.day) {
            errors.push(IntegrityError::UnknownShiftDay {
                shift: row.id.clone(),
                day: row.day,
            });
        }
        if row.length == 0 {
            errors.push(IntegrityError::EmptyShift(row.id.clone()));
        }
        if row.start.checked_add(row.length).is_none() {
            errors.push(IntegrityError::ShiftSpanOverflow {
                shift: row.id.clone(),
                start: row.start,
                length: row.length,
            });
        }
        if row.unpaid_breaks > row.length {
            errors.push(IntegrityError::BreaksExceedLength {
                shift: row.id.clone(),
                unpaid: row.unpaid_breaks,
                length: row.length,
            });
        }
    }

    for row in &data.blocked {
        if !employees.contains(row.employee.as_str()) {
            errors.push(IntegrityError::UnknownBlockedEmployee(row.employee.clone()));
        }
        if !days.contains(&row.day) {
            errors.push(IntegrityError::UnknownBlockedDay {
                employee: row.employee.clone(),
                day: row.day,
            });
        }
        if row.start >= row.end {
            errors.push(IntegrityError::EmptyBlockedRange {
                employee: row.employee.clone(),
                start: row.start,
                end: row.end,
            });
        }
    }

    let mut cells = HashSet::new();
    for row in &data.demand {
        if !cells.insert((row.job.as_str(), row.day, row.interval)) {
            errors.push(IntegrityError::DuplicateDemandCell {
                job: row.job.clone(),
                day: row.day,
                interval: row.interval,
            });
        }
        if !jobs.contains(row.job.as_str()) {
            errors.push(IntegrityError::UnknownDemandJob(row.job.clone()));
        }
        if !days.contains(&row.day) {
            errors.push(IntegrityError::UnknownDemandDay {
                job: row.job.clone(),
                day: row.day,
            });
        }
        if row.minimum > row.preferred {
            errors.push(IntegrityError::MinimumAbovePreferred {
                job: row.job.clone(),
                day: row.day,
                interval: row.interval,
                minimum: row.minimum,
                preferred: row.preferred,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
