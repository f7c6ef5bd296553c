//! Scheduling domain models.
//!
//! Raw entities loaded from a data source and normalized by the entity
//! store: employees, shift instances, and demand targets. Derived
//! artifacts (assignment candidates, flexible patterns, the assembled
//! model) live next to the code that generates them.
//!
//! All entities are immutable after the entity store is built and refer
//! to each other through dense `usize` indexes assigned at load time.

mod demand;
mod employee;
mod shift;

pub use demand::DemandTarget;
pub use employee::{Employee, Population};
pub use shift::ShiftInstance;
