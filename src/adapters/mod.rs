pub mod movie_metadata;
pub mod weekly_tables;

use std::collections::HashMap;
use std::path::PathBuf;

use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use weekly_tables::WeeklyRawTable;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("csv parse failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Where the engine pulls its CSV files from: a local directory or an HTTP
/// base URL.
#[derive(Debug, Clone)]
pub enum DataSource {
    Dir(PathBuf),
    Http(String),
}

impl DataSource {
    pub fn from_location(location: &str) -> DataSource {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Http(location.trim_end_matches('/').to_string())
        } else {
            DataSource::Dir(PathBuf::from(location))
        }
    }

    pub async fn fetch(&self, file: &str) -> Result<Vec<u8>, LoadError> {
        match self {
            DataSource::Dir(root) => Ok(tokio::fs::read(root.join(file)).await?),
            DataSource::Http(base) => {
                let url = format!("{}/{}", base, file);
                let response = reqwest::get(&url).await?.error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

/// Spreadsheet exports lead with a UTF-8 BOM; strip it before the CSV
/// reader sees the first header.
pub(crate) fn without_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}

/// Weekly tables that survived startup loading, plus the years that did
/// not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: HashMap<i32, WeeklyRawTable>,
    pub failed_years: Vec<i32>,
}

/// Fetches every year's weekly table concurrently. A year that fails to
/// load is logged and reported, never fatal; the engine serves whatever
/// loaded.
pub async fn preload_weekly_tables(source: &DataSource, years: &[i32]) -> LoadReport {
    let fetches = join_all(
        years
            .iter()
            .map(|&year| weekly_tables::fetch_weekly_table(source, year)),
    )
    .await;

    let mut report = LoadReport::default();
    for (&year, outcome) in years.iter().zip(fetches) {
        match outcome {
            Ok(table) => {
                info!(
                    year,
                    movies = table.headers.len(),
                    weeks = table.rows.len(),
                    "weekly table loaded"
                );
                report.tables.insert(year, table);
            }
            Err(error) => {
                warn!(year, error = %error, "weekly table failed to load");
                report.failed_years.push(year);
            }
        }
    }
    report
}
