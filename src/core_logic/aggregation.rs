use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

use crate::adapters::weekly_tables::WeeklyRawTable;
use crate::core_logic::series::{build_year_series, YearSeries};
use crate::core_logic::weighting::WeightParams;
use crate::core_logic::EngineError;
use crate::registry::models::Genre;
use crate::registry::{MovieRegistry, RatingRank};

/// A genre keeps its own slice of the breakdown while it holds at least this
/// share of the grand total; smaller slices fold into `etc`.
pub const GENRE_SHARE_THRESHOLD: f64 = 0.025;

#[derive(Debug, Clone, PartialEq)]
pub struct GenreBucket {
    pub genre: Genre,
    pub revenue: f64,
    pub count: usize,
}

/// Rolls per-movie adjusted totals up into genre buckets.
///
/// Buckets are emitted in canonical genre order. Buckets whose share of the
/// grand total falls under `threshold` fold into a single trailing `etc`
/// bucket; the fold is skipped entirely when the grand total is zero, and
/// `etc` only appears when it actually absorbed revenue.
pub fn genre_buckets(
    totals: &[(String, f64)],
    registry: &MovieRegistry,
    threshold: f64,
) -> Vec<GenreBucket> {
    let mut sums: HashMap<Genre, (f64, usize)> = HashMap::new();
    for (movie, total) in totals {
        let entry = sums.entry(registry.genre_of(movie)).or_insert((0.0, 0));
        entry.0 += total;
        entry.1 += 1;
    }

    let buckets: Vec<GenreBucket> = Genre::CANONICAL
        .iter()
        .filter_map(|genre| {
            sums.get(genre).map(|&(revenue, count)| GenreBucket {
                genre: *genre,
                revenue,
                count,
            })
        })
        .collect();

    let grand_total: f64 = buckets.iter().map(|bucket| bucket.revenue).sum();
    if grand_total <= 0.0 {
        return buckets;
    }

    let mut kept = Vec::with_capacity(buckets.len());
    let mut folded_revenue = 0.0;
    let mut folded_count = 0;
    for bucket in buckets {
        if bucket.revenue / grand_total < threshold {
            folded_revenue += bucket.revenue;
            folded_count += bucket.count;
        } else {
            kept.push(bucket);
        }
    }
    if folded_revenue > 0.0 {
        kept.push(GenreBucket {
            genre: Genre::Etc,
            revenue: folded_revenue,
            count: folded_count,
        });
    }
    kept
}

/// Cross-year adjusted totals per movie, plus the years that contributed
/// nothing because their table never loaded or failed to build.
#[derive(Debug, Clone, Default)]
pub struct OverallTotals {
    pub totals: HashMap<String, f64>,
    pub failed_years: Vec<i32>,
}

impl OverallTotals {
    /// Movies sorted by combined total, best first, with a title tiebreak.
    pub fn ranking(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .totals
            .iter()
            .map(|(movie, total)| (movie.clone(), *total))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }
}

/// Folds every requested year into combined per-movie totals.
///
/// Year tables are weighted in parallel, then folded sequentially in the
/// given year order so the result never depends on scheduling. A year
/// without a loaded table is skipped, logged, and reported in
/// `failed_years`; it never blocks the remaining years.
pub fn aggregate_overall(
    years: &[i32],
    tables: &HashMap<i32, WeeklyRawTable>,
    registry: &MovieRegistry,
    ranks: &RatingRank,
    params: WeightParams,
) -> OverallTotals {
    let built: Vec<(i32, Option<Result<YearSeries, EngineError>>)> = years
        .par_iter()
        .map(|&year| {
            let outcome = tables
                .get(&year)
                .map(|table| build_year_series(table, registry, ranks, params));
            (year, outcome)
        })
        .collect();

    let mut overall = OverallTotals::default();
    for (year, outcome) in built {
        match outcome {
            Some(Ok(series)) => {
                for (movie, total) in series.totals {
                    *overall.totals.entry(movie).or_insert(0.0) += total;
                }
            }
            Some(Err(error)) => {
                warn!(year, error = %error, "dropping year from overall totals");
                overall.failed_years.push(year);
            }
            None => {
                warn!(year, "no weekly table loaded for year");
                overall.failed_years.push(year);
            }
        }
    }
    overall
}
