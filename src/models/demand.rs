//! Staffing demand model.
//!
//! Demand is expressed per (job, day, interval) cell as a pair of
//! headcounts: a hard minimum and a softer preferred level. Both are
//! soft in the assembled model — shortfall is absorbed by penalized
//! slack variables rather than making the program infeasible.

use serde::{Deserialize, Serialize};

/// Staffing targets for one (job, day, interval) cell.
///
/// Invariant: `minimum <= preferred`. Enforced at entity-store build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandTarget {
    /// Dense index of the demanded job.
    pub job: usize,
    /// Day of the cell.
    pub day: u32,
    /// Interval of the cell.
    pub interval: u32,
    /// Hard minimum headcount.
    pub minimum: u32,
    /// Preferred headcount (≥ minimum).
    pub preferred: u32,
}

impl DemandTarget {
    /// Creates a new demand target.
    pub fn new(job: usize, day: u32, interval: u32, minimum: u32, preferred: u32) -> Self {
        Self {
            job,
            day,
            interval,
            minimum,
            preferred,
        }
    }

    /// Composite key of this cell.
    #[inline]
    pub fn cell(&self) -> (usize, u32, u32) {
        (self.job, self.day, self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key() {
        let demand = DemandTarget::new(2, 3, 14, 1, 2);
        assert_eq!(demand.cell(), (2, 3, 14));
    }
}
