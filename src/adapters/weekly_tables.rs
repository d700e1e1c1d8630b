use csv::ReaderBuilder;
use std::collections::HashMap;

use super::{without_bom, DataSource, LoadError};

/// One week of raw revenue cells, parallel to the table's headers. Cells
/// stay unparsed strings until weighting time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRawRow {
    pub week: u32,
    pub values: Vec<String>,
}

/// A year's raw weekly revenue table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRawTable {
    pub year: i32,
    /// Movie columns in source order.
    pub headers: Vec<String>,
    pub rows: Vec<WeeklyRawRow>,
}

/// Fetches and parses one year's weekly table (`<year>.csv`).
pub async fn fetch_weekly_table(
    source: &DataSource,
    year: i32,
) -> Result<WeeklyRawTable, LoadError> {
    let bytes = source.fetch(&format!("{}.csv", year)).await?;
    parse_weekly_csv(&bytes, year)
}

/// Parses a weekly table. The first column is the week number and every
/// other column is a movie. The first body row of the published files
/// repeats header information and is dropped, so data starts on the second
/// body row.
pub fn parse_weekly_csv(bytes: &[u8], year: i32) -> Result<WeeklyRawTable, LoadError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(without_bom(bytes));

    let header_record = reader.headers()?.clone();
    let mut headers: Vec<String> = Vec::new();
    let mut retained: Vec<usize> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();
    for (index, name) in header_record.iter().enumerate().skip(1) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match position.get(name) {
            // a repeated column keeps its first position, later cells win
            Some(&slot) => retained[slot] = index,
            None => {
                position.insert(name.to_string(), headers.len());
                headers.push(name.to_string());
                retained.push(index);
            }
        }
    }

    let mut rows = Vec::new();
    for (body_index, record) in reader.records().enumerate() {
        let record = record?;
        if body_index == 0 {
            continue;
        }
        let week = record
            .get(0)
            .map(str::trim)
            .and_then(|week| week.parse().ok())
            .unwrap_or(0);
        let values = retained
            .iter()
            .map(|&index| record.get(index).unwrap_or("").to_string())
            .collect();
        rows.push(WeeklyRawRow { week, values });
    }

    Ok(WeeklyRawTable {
        year,
        headers,
        rows,
    })
}
