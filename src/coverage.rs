//! Coverage and availability indexes.
//!
//! Precomputes, once per planning run:
//! - the ordered interval set each shift instance covers (exclusive end);
//! - a flattened (employee, day, interval) blocked set for O(1) lookup;
//! - per-(employee, day) prefix sums of blocked markers, so "is any
//!   interval in `[s, e)` blocked?" is a difference of two prefix sums;
//! - a prefix sum over the interval domain, so "is `[s, e)` entirely
//!   inside the domain?" is O(1) even when the domain has holes.
//!
//! The prefix sums are what keep flexible-pattern generation at
//! O(employees × jobs × days × starts × lengths) instead of paying an
//! extra factor of pattern length per feasibility probe.

use std::collections::{HashMap, HashSet};

use crate::store::EntityStore;

/// Read-only coverage and availability lookup tables.
#[derive(Debug, Clone)]
pub struct CoverageIndex {
    covers: Vec<Vec<u32>>,
    blocked: HashSet<(usize, u32, u32)>,
    /// Per (employee, day): prefix[t] = blocked intervals below t.
    /// Absent key = nothing blocked for that pair.
    blocked_prefix: HashMap<(usize, u32), Vec<u32>>,
    /// prefix[t] = domain intervals below t.
    domain_prefix: Vec<u32>,
    horizon: u32,
}

impl CoverageIndex {
    /// Builds the indexes from a store.
    pub fn build(store: &EntityStore) -> Self {
        let horizon = store.horizon();

        let covers: Vec<Vec<u32>> = store
            .shifts()
            .iter()
            .map(|shift| shift.span().collect())
            .collect();

        let mut blocked = HashSet::new();
        let mut per_pair: HashMap<(usize, u32), Vec<u32>> = HashMap::new();
        for &(employee, day, t) in store.blocked() {
            blocked.insert((employee, day, t));
            if t < horizon {
                per_pair.entry((employee, day)).or_default().push(t);
            }
        }

        let blocked_prefix = per_pair
            .into_iter()
            .map(|(pair, ts)| (pair, prefix_counts(&ts, horizon)))
            .collect();

        let domain_prefix = prefix_counts(store.intervals(), horizon);

        Self {
            covers,
            blocked,
            blocked_prefix,
            domain_prefix,
            horizon,
        }
    }

    /// One past the largest domain interval.
    #[inline]
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Ordered intervals covered by a shift instance.
    #[inline]
    pub fn covered_intervals(&self, shift: usize) -> &[u32] {
        &self.covers[shift]
    }

    /// Whether the employee is unavailable at (day, interval).
    #[inline]
    pub fn is_blocked(&self, employee: usize, day: u32, t: u32) -> bool {
        self.blocked.contains(&(employee, day, t))
    }

    /// Whether any interval of `[start, end)` is blocked for the
    /// employee on the day. O(1) via prefix sums; spans reaching past
    /// the horizon are clamped (out-of-domain intervals cannot carry
    /// blocked markers that matter).
    pub fn span_blocked(&self, employee: usize, day: u32, start: u32, end: u32) -> bool {
        let Some(prefix) = self.blocked_prefix.get(&(employee, day)) else {
            return false;
        };
        let lo = start.min(self.horizon) as usize;
        let hi = end.min(self.horizon) as usize;
        prefix[hi] > prefix[lo]
    }

    /// Whether every interval of `[start, end)` lies in the domain. O(1).
    pub fn span_in_domain(&self, start: u32, end: u32) -> bool {
        if end > self.horizon || start > end {
            return false;
        }
        let lo = start as usize;
        let hi = end as usize;
        self.domain_prefix[hi] - self.domain_prefix[lo] == end - start
    }
}

/// Prefix counts over a set of interval indexes: out[t] = how many of
/// `values` are strictly below t. Length horizon + 1.
fn prefix_counts(values: &[u32], horizon: u32) -> Vec<u32> {
    let mut marks = vec![0u32; horizon as usize + 1];
    for &t in values {
        if t < horizon {
            marks[t as usize + 1] += 1;
        }
    }
    for i in 1..marks.len() {
        marks[i] += marks[i - 1];
    }
    marks
}
