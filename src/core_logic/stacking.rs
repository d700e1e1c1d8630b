use ndarray::Array2;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::core_logic::series::YearSeries;
use crate::core_logic::EngineError;

/// One movie's vertical slice of the stack in one week. The band covers
/// `lower..upper` on the stacked axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandPoint {
    pub week: u32,
    pub lower: f64,
    pub upper: f64,
}

/// A movie's band across the whole year, bottom to top of the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayer {
    pub movie: String,
    pub points: Vec<BandPoint>,
}

/// Stack order for a year: movies sort by the first row where their adjusted
/// value turns positive, earliest first. Movies that never earn a positive
/// value sink to the end, and ties keep render column order, so the order is
/// reproducible for identical input.
pub fn appearance_order(series: &YearSeries) -> Result<Vec<String>, EngineError> {
    if series.headers.is_empty() {
        return Ok(Vec::new());
    }
    let values = adjusted_matrix(series)?;

    let mut keyed: Vec<(usize, usize)> = series
        .headers
        .iter()
        .enumerate()
        .map(|(column, _)| {
            let first_positive = values
                .column(column)
                .iter()
                .position(|value| *value > 0.0)
                .unwrap_or(usize::MAX);
            (first_positive, column)
        })
        .collect();
    keyed.sort_unstable();

    Ok(keyed
        .into_iter()
        .map(|(_, column)| series.headers[column].clone())
        .collect())
}

/// Accumulates the per-week stack in the given order. Within a week each
/// movie's band starts exactly where the previous band ended, so bands never
/// overlap and never leave gaps.
pub fn stack_layers(
    series: &YearSeries,
    ordered: &[String],
) -> Result<Vec<StackLayer>, EngineError> {
    if ordered.is_empty() {
        return Ok(Vec::new());
    }
    let weeks = series.weeks()?;
    let values = adjusted_matrix(series)?;
    let column_of: HashMap<&str, usize> = series
        .headers
        .iter()
        .enumerate()
        .map(|(column, name)| (name.as_str(), column))
        .collect();

    let mut layers: Vec<StackLayer> = ordered
        .iter()
        .map(|movie| StackLayer {
            movie: movie.clone(),
            points: Vec::with_capacity(weeks.len()),
        })
        .collect();

    for (row, &week) in weeks.iter().enumerate() {
        let mut offset = 0.0;
        for (index, movie) in ordered.iter().enumerate() {
            let column = match column_of.get(movie.as_str()) {
                Some(column) => *column,
                None => continue,
            };
            let lower = offset;
            let upper = lower + values[[row, column]];
            layers[index].points.push(BandPoint { week, lower, upper });
            offset = upper;
        }
    }

    Ok(layers)
}

/// Upper bound for the stacked axis: the tallest weekly stack, floored at
/// 1.0 so an all-zero year still renders a non-degenerate domain.
pub fn y_domain_max(layers: &[StackLayer]) -> f64 {
    let tallest = layers
        .last()
        .map(|top| {
            top.points
                .iter()
                .map(|point| point.upper)
                .fold(0.0, f64::max)
        })
        .unwrap_or(0.0);
    tallest.max(1.0)
}

fn adjusted_matrix(series: &YearSeries) -> Result<Array2<f64>, EngineError> {
    let movie_columns = series
        .table
        .select(series.headers.iter().map(String::as_str))?;
    Ok(movie_columns.to_ndarray::<Float64Type>(IndexOrder::Fortran)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_logic::series::WEEK_COLUMN;

    fn series_of(headers: &[&str], weeks: &[u32], columns: &[&[f64]]) -> YearSeries {
        let mut table_columns = vec![Series::new(WEEK_COLUMN, weeks.to_vec())];
        for (name, values) in headers.iter().zip(columns) {
            table_columns.push(Series::new(*name, values.to_vec()));
        }
        YearSeries {
            year: 2015,
            headers: headers.iter().map(|name| name.to_string()).collect(),
            table: DataFrame::new(table_columns).unwrap(),
            totals: headers
                .iter()
                .zip(columns)
                .map(|(name, values)| (name.to_string(), values.iter().sum()))
                .collect(),
        }
    }

    #[test]
    fn test_appearance_order_sorts_by_first_positive_week() {
        let series = series_of(
            &["Late", "Early", "Silent"],
            &[1, 2, 3],
            &[&[0.0, 5.0, 5.0], &[3.0, 0.0, 0.0], &[0.0, 0.0, 0.0]],
        );
        let order = appearance_order(&series).unwrap();
        assert_eq!(order, vec!["Early", "Late", "Silent"]);
    }

    #[test]
    fn test_appearance_order_ties_keep_column_order() {
        let series = series_of(
            &["First", "Second"],
            &[1, 2],
            &[&[1.0, 1.0], &[2.0, 0.0]],
        );
        let order = appearance_order(&series).unwrap();
        assert_eq!(order, vec!["First", "Second"]);
    }

    #[test]
    fn test_layers_partition_each_week() {
        let series = series_of(
            &["Late", "Early", "Silent"],
            &[1, 2, 3],
            &[&[0.0, 5.0, 5.0], &[3.0, 0.0, 2.0], &[0.0, 0.0, 0.0]],
        );
        let order = appearance_order(&series).unwrap();
        let layers = stack_layers(&series, &order).unwrap();

        assert_eq!(layers.len(), 3);
        for layer in &layers {
            assert_eq!(layer.points.len(), 3);
            for point in &layer.points {
                assert!(point.upper >= point.lower);
            }
        }

        // bottom band starts at zero, every band starts where the one
        // below it ends
        for week_index in 0..3 {
            assert_eq!(layers[0].points[week_index].lower, 0.0);
            for layer_index in 1..layers.len() {
                assert_eq!(
                    layers[layer_index].points[week_index].lower,
                    layers[layer_index - 1].points[week_index].upper
                );
            }
        }

        // top of the stack equals the weekly sum
        let tops: Vec<f64> = layers[2].points.iter().map(|point| point.upper).collect();
        assert_eq!(tops, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_stacking_is_deterministic() {
        let series = series_of(
            &["A", "B", "C"],
            &[1, 2],
            &[&[0.0, 4.0], &[1.0, 1.0], &[2.0, 0.0]],
        );
        let order_a = appearance_order(&series).unwrap();
        let order_b = appearance_order(&series).unwrap();
        assert_eq!(order_a, order_b);

        let layers_a = stack_layers(&series, &order_a).unwrap();
        let layers_b = stack_layers(&series, &order_b).unwrap();
        assert_eq!(layers_a, layers_b);
    }

    #[test]
    fn test_empty_series_stacks_to_nothing() {
        let series = series_of(&[], &[1, 2], &[]);
        let order = appearance_order(&series).unwrap();
        assert!(order.is_empty());
        let layers = stack_layers(&series, &order).unwrap();
        assert!(layers.is_empty());
    }

    #[test]
    fn test_y_domain_max_floors_at_one() {
        let series = series_of(&["Only"], &[1, 2], &[&[0.4, 0.2]]);
        let order = appearance_order(&series).unwrap();
        let layers = stack_layers(&series, &order).unwrap();
        assert_eq!(y_domain_max(&layers), 1.0);
        assert_eq!(y_domain_max(&[]), 1.0);

        let series = series_of(&["Only"], &[1, 2], &[&[0.4, 2.5]]);
        let layers = stack_layers(&series, &appearance_order(&series).unwrap()).unwrap();
        assert_eq!(y_domain_max(&layers), 2.5);
    }
}
