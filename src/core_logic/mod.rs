pub mod aggregation;
pub mod series;
pub mod session;
pub mod stacking;
pub mod weighting;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure while assembling or slicing an adjusted table. Malformed input
/// never lands here; unparseable cells and unknown titles degrade to zero
/// contributions instead of erroring.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("table operation failed: {0}")]
    Table(#[from] PolarsError),
}
