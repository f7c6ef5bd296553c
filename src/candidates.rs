//! Fixed-assignment candidate generation.
//!
//! Enumerates the sparse set of legal (employee, shift, day) triplets.
//! A triplet is legal iff the employee holds the shift's job skill and
//! no interval the shift covers is blocked for the employee on the
//! shift's day. Infeasible triplets are never materialized — downstream
//! code must never construct a decision variable outside this set.
//!
//! The skill test runs first (cheapest reject); the blocked test is a
//! single O(1) prefix-sum probe over the shift's covered span.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageIndex;
use crate::store::EntityStore;

/// A feasible (employee, shift, day) assignment candidate.
///
/// `day` is denormalized from the shift instance so the model builder
/// can group per (employee, day) without chasing the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentCandidate {
    /// Dense employee index.
    pub employee: usize,
    /// Dense shift-instance index.
    pub shift: usize,
    /// Day of the shift instance.
    pub day: u32,
}

/// Generates all feasible fixed-assignment candidates.
///
/// Deterministic: employees in arena order, shifts in arena order.
/// Re-running on unchanged inputs yields an identical set.
pub fn generate_candidates(
    store: &EntityStore,
    coverage: &CoverageIndex,
) -> Vec<AssignmentCandidate> {
    let mut candidates = Vec::new();

    for employee in store.employees() {
        for shift in store.shifts() {
            if !store.has_skill(employee.index, shift.job) {
                continue;
            }
            if coverage.span_blocked(employee.index, shift.day, shift.start, shift.end()) {
                continue;
            }
            candidates.push(AssignmentCandidate {
                employee: employee.index,
                shift: shift.index,
                day: shift.day,
            });
        }
    }

    debug!(
        "generated {} fixed candidates from {} employees x {} shifts",
        candidates.len(),
        store.employees().len(),
        store.shifts().len()
    );
    candidates
}
