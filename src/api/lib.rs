use crate::api::models::{ChartParameters, OverallParameters};
use crate::core_logic::weighting::WeightParams;

/// Number of steps on the tuning gauges; values snap to step boundaries.
pub const GAUGE_SEGMENTS: u32 = 10;

pub fn chart_weight_params(params: &ChartParameters) -> WeightParams {
    weight_params(
        params.rating_factor,
        params.award_factor,
        params.revenue_factor,
    )
}

pub fn overall_weight_params(params: &OverallParameters) -> WeightParams {
    weight_params(
        params.rating_factor,
        params.award_factor,
        params.revenue_factor,
    )
}

fn weight_params(rating: Option<f64>, award: Option<f64>, revenue: Option<f64>) -> WeightParams {
    let defaults = WeightParams::default();
    WeightParams {
        rating_factor: rating.unwrap_or(defaults.rating_factor),
        award_factor: award.unwrap_or(defaults.award_factor),
        revenue_factor: revenue.unwrap_or(defaults.revenue_factor),
    }
    .clamped()
}

/// Requested highlight genre; anything absent or blank means "Total", which
/// highlights nothing.
pub fn selected_genre(params: &ChartParameters) -> String {
    match &params.selected_genre {
        Some(genre) if !genre.trim().is_empty() => genre.trim().to_string(),
        _ => String::from("Total"),
    }
}

/// Snaps a gauge position to the nearest segment boundary and keeps it
/// inside the gauge limits. Non-finite input reads as zero, so the snap
/// always lands somewhere.
pub fn snap_gauge(value: f64, min: f64, max: f64) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    let step = 100.0 / GAUGE_SEGMENTS as f64;
    ((value / step).round() * step).max(min).min(max)
}
