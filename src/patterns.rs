//! Flexible work-pattern generation.
//!
//! For part-time-eligible employees the schedule is not limited to
//! pre-defined shift instances: any (start, length) block drawn from a
//! configured length catalog — optionally restricted to a start-time
//! window — is a candidate, provided the employee holds the job skill,
//! the block stays inside the interval domain, and no covered interval
//! is blocked.
//!
//! Flexible patterns carry no unpaid break: paid intervals equal the
//! pattern length, and cost is wage × unit time × length.
//!
//! Feasibility probes use the coverage index's prefix sums, so each
//! (start, length) candidate costs O(1) rather than O(length).

use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::coverage::CoverageIndex;
use crate::model::ConfigError;
use crate::store::EntityStore;

/// Configuration for pattern enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Allowed pattern lengths, in intervals. Must be non-empty, all
    /// positive.
    pub allowed_lengths: Vec<u32>,
    /// Optional inclusive `[lo, hi]` window restricting candidate start
    /// intervals. `None` = the full interval domain.
    pub start_window: Option<(u32, u32)>,
}

impl PatternConfig {
    /// Creates a config with the given length catalog and no window.
    pub fn new(allowed_lengths: impl Into<Vec<u32>>) -> Self {
        Self {
            allowed_lengths: allowed_lengths.into(),
            start_window: None,
        }
    }

    /// Restricts candidate starts to the inclusive window `[lo, hi]`.
    pub fn with_start_window(mut self, lo: u32, hi: u32) -> Self {
        self.start_window = Some((lo, hi));
        self
    }

    /// Checks catalog and window well-formedness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_lengths.is_empty() {
            return Err(ConfigError::EmptyLengthCatalog);
        }
        if self.allowed_lengths.contains(&0) {
            return Err(ConfigError::ZeroPatternLength);
        }
        if let Some((lo, hi)) = self.start_window {
            if lo > hi {
                return Err(ConfigError::InvertedStartWindow { lo, hi });
            }
        }
        Ok(())
    }
}

impl Default for PatternConfig {
    /// 3h, 4h and 5h blocks on a 30-minute grid.
    fn default() -> Self {
        Self::new([6, 8, 10])
    }
}

/// A generated flexible work block.
///
/// `id` is a dense, opaque identifier assigned at emission time; it is
/// only used to index into the assembled model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexiblePattern {
    /// Dense pattern id.
    pub id: usize,
    /// Dense employee index.
    pub employee: usize,
    /// Dense job index.
    pub job: usize,
    /// Day the block is worked.
    pub day: u32,
    /// First covered interval.
    pub start: u32,
    /// Length in intervals.
    pub length: u32,
    /// Total wage cost if used: wage × unit time × length.
    pub cost: f64,
}

impl FlexiblePattern {
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

    /// Paid intervals. Flexible patterns have no unpaid break.
    #[inline]
    pub fn paid_intervals(&self) -> u32 {
        self.length
    }

    /// Whether this pattern covers interval `t`.
    #[inline]
    pub fn covers(&self, t: u32) -> bool {
        t >= self.start && t < self.end()
    }

    /// The generation tuple, without the opaque id or derived cost.
    #[inline]
    pub fn key(&self) -> (usize, usize, u32, u32, u32) {
        (self.employee, self.job, self.day, self.start, self.length)
    }
}

/// Enumerates all feasible flexible patterns.
///
/// Deterministic: employees, jobs, days, and starts are each visited
/// in ascending order, lengths in catalog order, so regeneration on
/// unchanged inputs yields identical ids and tuples.
pub fn generate_patterns(
    store: &EntityStore,
    coverage: &CoverageIndex,
    config: &PatternConfig,
    unit_time: f64,
) -> Result<Vec<FlexiblePattern>, ConfigError> {
    config.validate()?;

    let starts: Vec<u32> = match config.start_window {
        None => store.intervals().to_vec(),
        Some((lo, hi)) => store
            .intervals()
            .iter()
            .copied()
            .filter(|&t| t >= lo && t <= hi)
            .collect(),
    };

    let mut patterns = Vec::new();
    for employee in store.employees() {
        if !employee.is_flexible_eligible() {
            continue;
        }
        for job in 0..store.jobs().len() {
            if !store.has_skill(employee.index, job) {
                continue;
            }
            for &day in store.days() {
                for &start in &starts {
                    for &length in &config.allowed_lengths {
                        let Some(end) = start.checked_add(length) else {
                            continue;
                        };
                        if !coverage.span_in_domain(start, end) {
                            continue;
                        }
                        if coverage.span_blocked(employee.index, day, start, end) {
                            continue;
                        }
                        patterns.push(FlexiblePattern {
                            id: patterns.len(),
                            employee: employee.index,
                            job,
                            day,
                            start,
                            length,
                            cost: employee.wage * unit_time * f64::from(length),
                        });
                    }
                }
            }
        }
    }

    debug!(
        "generated {} flexible patterns over {} start times",
        patterns.len(),
        starts.len()
    );
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BlockedRow, DemandRow, EmployeeRow, RosterData, SkillRow};
    use crate::models::Population;

    /// Part-time cashier, demand over [10, 18), no shifts.
    fn base_data() -> RosterData {
        RosterData {
            jobs: vec!["cashier".into()],
            days: vec![1],
            employees: vec![EmployeeRow {
                id: "P1".into(),
                wage: 16.0,
                population: Population::part_time("PT20"),
            }],
            skills: vec![SkillRow {
                employee: "P1".into(),
                job: "cashier".into(),
            }],
            shifts: vec![],
            blocked: vec![],
            demand: (10..18)
                .map(|t| DemandRow {
                    job: "cashier".into(),
                    day: 1,
                    interval: t,
                    minimum: 0,
                    preferred: 1,
                })
                .collect(),
        }
    }

    fn patterns_for(data: &RosterData, config: &PatternConfig) -> Vec<FlexiblePattern> {
        let store = EntityStore::build(data).unwrap();
        let coverage = CoverageIndex::build(&store);
        generate_patterns(&store, &coverage, config, 0.5).unwrap()
    }

    #[test]
    fn test_pinned_window_single_pattern() {
        let config = PatternConfig::new([4]).with_start_window(10, 10);
        let patterns = patterns_for(&base_data(), &config);

        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!((p.start, p.length), (10, 4));
        assert_eq!(p.span(), 10..14);
        assert_eq!(p.paid_intervals(), 4);
        assert!((p.cost - 16.0 * 0.5 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_patterns_stay_inside_domain() {
        let config = PatternConfig::new([4]);
        let patterns = patterns_for(&base_data(), &config);

        // Domain is [10, 18): starts 10..=14 fit a length-4 block.
        assert_eq!(patterns.len(), 5);
        assert!(patterns.iter().all(|p| p.end() <= 18));
    }

    #[test]
    fn test_full_time_employees_get_no_patterns() {
        let mut data = base_data();
        data.employees[0].population = Population::FullTime;
        let patterns = patterns_for(&data, &PatternConfig::new([4]));
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_unskilled_job_gets_no_patterns() {
        let mut data = base_data();
        data.skills.clear();
        let patterns = patterns_for(&data, &PatternConfig::new([4]));
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_blocked_interval_rejects_overlapping_patterns() {
        let mut data = base_data();
        data.blocked.push(BlockedRow {
            employee: "P1".into(),
            day: 1,
            start: 12,
            end: 13,
        });
        let patterns = patterns_for(&data, &PatternConfig::new([4]));

        // Starts 10..=12 would cover t=12; only 13 and 14 survive.
        assert_eq!(patterns.len(), 2);
        assert!(patterns.iter().all(|p| !p.covers(12)));
    }

    #[test]
    fn test_regeneration_matches_exactly() {
        let data = base_data();
        let store = EntityStore::build(&data).unwrap();
        let coverage = CoverageIndex::build(&store);
        let config = PatternConfig::new([2, 4]);

        let first = generate_patterns(&store, &coverage, &config, 0.5).unwrap();
        let second = generate_patterns(&store, &coverage, &config, 0.5).unwrap();
        assert_eq!(
            first.iter().map(FlexiblePattern::key).collect::<Vec<_>>(),
            second.iter().map(FlexiblePattern::key).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_oversized_length_is_skipped() {
        // start + length would overflow u32; the candidate is skipped,
        // never evaluated against the domain.
        let patterns = patterns_for(&base_data(), &PatternConfig::new([u32::MAX]));
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            PatternConfig::new([]).validate(),
            Err(ConfigError::EmptyLengthCatalog)
        ));
        assert!(matches!(
            PatternConfig::new([0, 4]).validate(),
            Err(ConfigError::ZeroPatternLength)
        ));
        assert!(matches!(
            PatternConfig::new([4]).with_start_window(12, 10).validate(),
            Err(ConfigError::InvertedStartWindow { .. })
        ));
    }

    #[test]
    fn test_generated_patterns_pass_revalidation() {
        let mut data = base_data();
        data.blocked.push(BlockedRow {
            employee: "P1".into(),
            day: 1,
            start: 15,
            end: 16,
        });
        let store = EntityStore::build(&data).unwrap();
        let coverage = CoverageIndex::build(&store);
        let patterns =
            generate_patterns(&store, &coverage, &PatternConfig::new([2, 4]), 0.5).unwrap();

        for p in &patterns {
            assert!(store.employee(p.employee).is_flexible_eligible());
            assert!(store.has_skill(p.employee, p.job));
            for t in p.span() {
                assert!(!coverage.is_blocked(p.employee, p.day, t));
            }
        }
    }
}
