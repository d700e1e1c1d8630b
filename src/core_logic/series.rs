use polars::prelude::*;
use std::cmp::Ordering;

use crate::adapters::weekly_tables::WeeklyRawTable;
use crate::core_logic::weighting::{adjusted_value, parse_raw_value, WeightParams};
use crate::core_logic::EngineError;
use crate::registry::{MovieRegistry, RatingRank};

pub const WEEK_COLUMN: &str = "week";

/// A year's fully weighted table: one `week` column plus one f64 column per
/// movie. Movie columns sit in render order, which is the source column
/// order reversed.
#[derive(Debug, Clone)]
pub struct YearSeries {
    pub year: i32,
    /// Movie columns of `table`, in render order.
    pub headers: Vec<String>,
    pub table: DataFrame,
    /// Adjusted yearly total per movie, parallel to `headers`.
    pub totals: Vec<(String, f64)>,
}

impl YearSeries {
    pub fn weeks(&self) -> Result<Vec<u32>, EngineError> {
        Ok(self
            .table
            .column(WEEK_COLUMN)?
            .u32()?
            .into_no_null_iter()
            .collect())
    }

    /// Movies sorted by adjusted yearly total, best first. Ties break on
    /// title so repeated builds rank identically.
    pub fn ranking(&self) -> Vec<(String, f64)> {
        let mut entries = self.totals.clone();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }
}

/// Builds the adjusted weekly table for one year.
///
/// Every raw cell runs through the weighting formula with the movie's
/// catalogue record and rating rank; titles missing from the rating snapshot
/// fall back to a rank equal to the movie count, the weakest damping the
/// table can produce.
pub fn build_year_series(
    raw: &WeeklyRawTable,
    registry: &MovieRegistry,
    ranks: &RatingRank,
    params: WeightParams,
) -> Result<YearSeries, EngineError> {
    let mut headers = raw.headers.clone();
    headers.reverse();

    let weeks: Vec<u32> = raw.rows.iter().map(|row| row.week).collect();
    let fallback_rank = raw.headers.len();

    let mut columns = Vec::with_capacity(headers.len() + 1);
    columns.push(Series::new(WEEK_COLUMN, weeks));
    let mut totals = Vec::with_capacity(headers.len());

    for (position, movie) in headers.iter().enumerate() {
        // headers is raw.headers reversed, so index back into source columns
        let source_index = raw.headers.len() - 1 - position;
        let record = registry.get(movie);
        let rank = ranks.rank_of(movie).unwrap_or(fallback_rank);

        let mut column = Vec::with_capacity(raw.rows.len());
        let mut total = 0.0;
        for row in &raw.rows {
            let cell = row
                .values
                .get(source_index)
                .map(String::as_str)
                .unwrap_or("");
            let value = adjusted_value(parse_raw_value(cell), record, rank, params);
            total += value;
            column.push(value);
        }

        totals.push((movie.clone(), total));
        columns.push(Series::new(movie.as_str(), column));
    }

    let table = DataFrame::new(columns)?;
    Ok(YearSeries {
        year: raw.year,
        headers,
        table,
        totals,
    })
}
