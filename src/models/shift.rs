//! Shift instance model.
//!
//! A shift instance is a pre-defined work block template: a job, a day,
//! a start interval and a length, with an optional unpaid-break allowance.
//! Each instance belongs to exactly one day and is assignable to at most
//! one employee.
//!
//! # Time Model
//! Time is a per-day grid of discrete intervals identified by integer
//! index. A shift starting at `s` with length `L` covers the half-open
//! range `[s, s + L)`; the end interval is never covered. The same
//! convention applies to flexible patterns and demand aggregation.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A pre-defined shift instance.
///
/// Immutable after the entity store is built. `index` is the position in
/// the store's shift arena; `job` is a dense job index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftInstance {
    /// Dense index into the entity store's shift list.
    pub index: usize,
    /// External identifier from the data source.
    pub id: String,
    /// Dense index of the job this shift performs.
    pub job: usize,
    /// Day this instance belongs to.
    pub day: u32,
    /// First covered interval.
    pub start: u32,
    /// Total length in intervals.
    pub length: u32,
    /// Unpaid break length in intervals (≤ length).
    pub unpaid_breaks: u32,
}

impl ShiftInstance {
    /// Creates a new shift instance.
    pub fn new(
        index: usize,
        id: impl Into<String>,
        job: usize,
        day: u32,
        start: u32,
        length: u32,
        unpaid_breaks: u32,
    ) -> Self {
        Self {
            index,
            id: id.into(),
            job,
            day,
            start,
            length,
            unpaid_breaks,
        }
    }

    /// First interval past the covered range (exclusive end).
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    /// Covered interval range `[start, end)`.
    #[inline]
    pub fn span(&self) -> Range<u32> {
        self.start..self.end()
    }

    /// Paid intervals: length minus unpaid breaks.
    #[inline]
    pub fn paid_intervals(&self) -> u32 {
        self.length - self.unpaid_breaks
    }

    /// Whether this shift covers interval `t`.
    #[inline]
    pub fn covers(&self, t: u32) -> bool {
        t >= self.start && t < self.end()
    }
}
