//! Workforce shift scheduling optimization core.
//!
//! Assigns employees to time-discretized shifts across a multi-day
//! horizon, minimizing labor cost while meeting per-job, per-interval
//! staffing targets. Fixed full-time shift templates and freely-timed
//! part-time work blocks are scheduled together under skill,
//! availability, and one-shift-per-day constraints.
//!
//! # Modules
//!
//! - **`models`**: Raw entities — `Employee`, `ShiftInstance`,
//!   `DemandTarget`
//! - **`data`**: Typed row bundle and the `DataSource` contract
//! - **`validation`**: Input integrity checks (fatal before any build)
//! - **`store`**: Normalized entity store with dense indexes
//! - **`coverage`**: Shift coverage and blocked-time indexes (prefix
//!   sums for O(1) span feasibility)
//! - **`candidates`**: Sparse feasible (employee, shift, day) set
//! - **`patterns`**: Generated flexible work blocks for part-time staff
//! - **`model`**: Solver-agnostic MILP assembly
//! - **`solve`**: `Solver` trait and the bundled `good_lp`/microlp
//!   backend
//! - **`report`**: Solution interpretation for export layers
//! - **`planner`**: End-to-end pipeline
//!
//! # Design
//!
//! Feasibility is enforced by omission: infeasible combinations never
//! become decision variables, so the model carries no always-zero
//! variables or dead inequalities. Demand is soft — shortfall flows
//! into penalized integer slack — so a correctly assembled model is
//! always feasible. Coverage uses the exclusive-end convention
//! `[start, start + length)` everywhere.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod candidates;
pub mod coverage;
pub mod data;
pub mod model;
pub mod models;
pub mod patterns;
pub mod planner;
pub mod report;
pub mod solve;
pub mod store;
pub mod validation;

pub use candidates::{generate_candidates, AssignmentCandidate};
pub use coverage::CoverageIndex;
pub use data::{DataSource, RosterData};
pub use model::{ModelConfig, ScheduleModel, ScheduleModelBuilder};
pub use patterns::{generate_patterns, FlexiblePattern, PatternConfig};
pub use planner::{PlanError, Planner};
pub use report::SolvedSchedule;
pub use solve::{MilpSolver, SolveLimits, SolveOutcome, SolveStatus, Solver};
pub use store::EntityStore;
pub use validation::{validate_roster, IntegrityError};
