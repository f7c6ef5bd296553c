//! Employee model.
//!
//! Employees are the assignable workforce. Each employee carries a wage
//! (cost per unit of time) and a population tag that decides whether the
//! flexible-pattern generator may invent work blocks for them.
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering: A review"

use serde::{Deserialize, Serialize};

/// Contract population an employee belongs to.
///
/// Full-time employees may only take pre-defined shift instances.
/// Part-time employees are additionally eligible for generated flexible
/// patterns. The tag (e.g. `"PT20"`, `"PT25"`) distinguishes part-time
/// sub-populations with different weekly-hour contracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Population {
    /// Full-time contract: fixed shift instances only.
    FullTime,
    /// Part-time contract with a sub-population tag.
    PartTime(String),
}

impl Population {
    /// Whether this population is eligible for flexible patterns.
    #[inline]
    pub fn is_part_time(&self) -> bool {
        matches!(self, Population::PartTime(_))
    }

    /// Creates a part-time population from a tag.
    pub fn part_time(tag: impl Into<String>) -> Self {
        Population::PartTime(tag.into())
    }
}

/// An employee who can be assigned to shifts.
///
/// Immutable after the entity store is built. `index` is the position in
/// the store's employee arena; generators and the model builder refer to
/// employees exclusively by this index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Dense index into the entity store's employee list.
    pub index: usize,
    /// External identifier from the data source.
    pub id: String,
    /// Cost per unit of time (non-negative).
    pub wage: f64,
    /// Contract population.
    pub population: Population,
}

impl Employee {
    /// Creates a new employee.
    pub fn new(index: usize, id: impl Into<String>, wage: f64, population: Population) -> Self {
        Self {
            index,
            id: id.into(),
            wage,
            population,
        }
    }

    /// Whether the flexible-pattern generator may emit patterns for
    /// this employee.
    #[inline]
    pub fn is_flexible_eligible(&self) -> bool {
        self.population.is_part_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_time_eligibility() {
        let ft = Employee::new(0, "E1", 20.0, Population::FullTime);
        let pt = Employee::new(1, "E2", 15.0, Population::part_time("PT20"));

        assert!(!ft.is_flexible_eligible());
        assert!(pt.is_flexible_eligible());
    }

    #[test]
    fn test_population_tags_are_distinct() {
        assert_ne!(Population::part_time("PT20"), Population::part_time("PT25"));
        assert_ne!(Population::part_time("PT20"), Population::FullTime);
    }
}
