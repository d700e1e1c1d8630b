use crate::registry::models::MovieRecord;

pub const FACTOR_MIN: f64 = 0.0;
pub const FACTOR_MAX: f64 = 100.0;
/// The revenue factor never drops below this, so adjusted values cannot be
/// scaled all the way to zero.
pub const REVENUE_FACTOR_FLOOR: f64 = 1.0;

/// User-tunable weighting factors, each on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightParams {
    pub rating_factor: f64,
    pub award_factor: f64,
    pub revenue_factor: f64,
}

impl Default for WeightParams {
    /// Neutral settings: no rating or award boost, revenue at face value.
    fn default() -> WeightParams {
        WeightParams {
            rating_factor: 0.0,
            award_factor: 0.0,
            revenue_factor: 100.0,
        }
    }
}

impl WeightParams {
    /// Forces every factor back into its domain. Out-of-range values clamp,
    /// non-finite values reset to zero; requests are never rejected over a
    /// bad factor.
    pub fn clamped(self) -> WeightParams {
        WeightParams {
            rating_factor: clamp_factor(self.rating_factor),
            award_factor: clamp_factor(self.award_factor),
            revenue_factor: clamp_factor(self.revenue_factor),
        }
    }
}

pub fn clamp_factor(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(FACTOR_MIN, FACTOR_MAX)
    } else {
        FACTOR_MIN
    }
}

/// Parses one raw weekly revenue cell. Cells carry thousands separators;
/// anything that does not survive the parse counts as zero revenue.
pub fn parse_raw_value(raw: &str) -> u64 {
    raw.trim().replace(',', "").parse().unwrap_or(0)
}

/// Applies the weighting formula to a single raw weekly value.
///
/// The raw value is first scaled by `revenue_factor` (floored so it never
/// collapses to zero). Movies present in the catalogue then earn a
/// multiplicative boost from their audience rating and award count; the
/// rating term is damped by `1 / ln(rank + 1)` so lower-ranked movies gain
/// less. `rating_rank` is 1-based. Uncatalogued movies only get the revenue
/// scaling.
pub fn adjusted_value(
    raw: u64,
    record: Option<&MovieRecord>,
    rating_rank: usize,
    params: WeightParams,
) -> f64 {
    let revenue_scale = params.revenue_factor.max(REVENUE_FACTOR_FLOOR) / 100.0;
    let scaled = raw as f64 * revenue_scale;

    let record = match record {
        Some(record) => record,
        None => return scaled,
    };

    let mut boost = 1.0;
    if params.rating_factor > 0.0 {
        let rank_weight = 1.0 / ((rating_rank as f64) + 1.0).ln();
        boost += record.audience_rating * params.rating_factor / 10.0 * rank_weight;
    }
    if params.award_factor > 0.0 {
        boost += record.awards as f64 * params.award_factor / 10.0;
    }

    scaled * boost
}
