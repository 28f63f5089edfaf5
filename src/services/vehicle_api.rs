//! Trait for a source of per-plate vehicle datasets.

use anyhow::Result;

use crate::record::{Defect, Record};
use crate::vehicle::Category;

/// Abstraction over a vehicle open-data provider (e.g., RDW).
#[async_trait::async_trait]
pub trait VehicleApi: Send + Sync {
    /// Returns every row of `category` for `plate` (no dashes). An unknown
    /// plate yields an empty list, not an error.
    async fn category_rows(&self, category: Category, plate: &str) -> Result<Vec<Record>>;

    /// Returns the defects recorded under one inspection report number.
    async fn defects(&self, report_number: &str) -> Result<Vec<Defect>>;
}
