//! Data source contract.
//!
//! The core never parses files. An external collaborator (CSV loader,
//! database adapter, test fixture) produces already-typed rows and hands
//! them over as a [`RosterData`] bundle. The entity store validates and
//! normalizes the bundle; everything downstream works on dense indexes.

use serde::{Deserialize, Serialize};

use crate::models::Population;

/// One employee row: id, wage per unit time, contract population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub id: String,
    pub wage: f64,
    pub population: Population,
}

/// One skill grant: the employee may work the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRow {
    pub employee: String,
    pub job: String,
}

/// One pre-defined shift instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRow {
    pub id: String,
    pub job: String,
    pub day: u32,
    pub start: u32,
    pub length: u32,
    pub unpaid_breaks: u32,
}

/// One blocked-time row: the employee is unavailable on `day` for the
/// half-open interval range `[start, end)`. Expanded to individual
/// intervals by the entity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedRow {
    pub employee: String,
    pub day: u32,
    pub start: u32,
    pub end: u32,
}

/// One staffing-demand cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRow {
    pub job: String,
    pub day: u32,
    pub interval: u32,
    pub minimum: u32,
    pub preferred: u32,
}

/// Typed row bundle produced by a data source.
///
/// `jobs` and `days` are the declared domains; every row referencing a
/// job or day outside them is a data-integrity error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterData {
    /// Declared job domain.
    pub jobs: Vec<String>,
    /// Declared day domain.
    pub days: Vec<u32>,
    pub employees: Vec<EmployeeRow>,
    pub skills: Vec<SkillRow>,
    pub shifts: Vec<ShiftRow>,
    pub blocked: Vec<BlockedRow>,
    pub demand: Vec<DemandRow>,
}

impl RosterData {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A source of typed roster rows.
///
/// Implementations own all file or database access; the scheduling core
/// performs no I/O of its own.
pub trait DataSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produces the full row bundle for one planning run.
    fn load(&mut self) -> Result<RosterData, Self::Error>;
}

impl DataSource for RosterData {
    type Error = std::convert::Infallible;

    fn load(&mut self) -> Result<RosterData, Self::Error> {
        Ok(self.clone())
    }
}
