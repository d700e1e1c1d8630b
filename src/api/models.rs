use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core_logic::aggregation::GenreBucket;
use crate::core_logic::stacking::{BandPoint, StackLayer};
use crate::registry::MovieRegistry;

/// Query parameters shared by the single-year chart endpoints. Everything is
/// optional; omitted factors use the neutral defaults and omitted genre
/// means no highlight.
#[derive(Deserialize, Clone)]
pub struct ChartParameters {
    pub year: Option<i32>,
    pub rating_factor: Option<f64>,
    pub award_factor: Option<f64>,
    pub revenue_factor: Option<f64>,
    pub selected_genre: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct OverallParameters {
    pub rating_factor: Option<f64>,
    pub award_factor: Option<f64>,
    pub revenue_factor: Option<f64>,
}

#[derive(Deserialize, Clone)]
pub struct GaugeParameters {
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Serialize, Debug, Clone)]
pub struct GaugeData {
    pub value: f64,
}

/// One stacked band, decorated for rendering.
#[derive(Serialize, Debug, Clone)]
pub struct LayerData {
    pub movie: String,
    pub genre: &'static str,
    pub color: &'static str,
    pub dimmed: bool,
    pub points: Vec<BandPoint>,
}

impl LayerData {
    /// Attaches genre, color and the highlight state to a stacked layer.
    /// Selecting "Total" highlights nothing, so no layer dims; any other
    /// selection dims every layer whose genre tag differs.
    pub fn decorate(
        layer: StackLayer,
        registry: &MovieRegistry,
        selected_genre: &str,
    ) -> LayerData {
        let genre = registry.genre_of(&layer.movie);
        LayerData {
            movie: layer.movie,
            genre: genre.tag(),
            color: genre.color(),
            dimmed: selected_genre != "Total" && selected_genre != genre.tag(),
            points: layer.points,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RankingEntry {
    pub movie: String,
    pub genre: &'static str,
    pub color: &'static str,
    pub total: f64,
}

impl RankingEntry {
    pub fn decorate(entries: Vec<(String, f64)>, registry: &MovieRegistry) -> Vec<RankingEntry> {
        entries
            .into_iter()
            .map(|(movie, total)| {
                let genre = registry.genre_of(&movie);
                RankingEntry {
                    movie,
                    genre: genre.tag(),
                    color: genre.color(),
                    total,
                }
            })
            .collect()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct StreamgraphData {
    pub year: i32,
    pub y_max: f64,
    pub layers: Vec<LayerData>,
    pub ranking: Vec<RankingEntry>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct GenreBucketData {
    pub genre: &'static str,
    pub color: &'static str,
    pub revenue: f64,
    pub count: usize,
}

impl GenreBucketData {
    pub fn from_bucket(bucket: &GenreBucket) -> GenreBucketData {
        GenreBucketData {
            genre: bucket.genre.tag(),
            color: bucket.genre.color(),
            revenue: bucket.revenue,
            count: bucket.count,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GenreBreakdownData {
    pub year: i32,
    pub total_revenue: f64,
    pub buckets: Vec<GenreBucketData>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct RankingData {
    pub year: i32,
    pub entries: Vec<RankingEntry>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct OverallData {
    pub start_year: i32,
    pub end_year: i32,
    pub entries: Vec<RankingEntry>,
    pub failed_years: Vec<i32>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct HealthData {
    pub status: &'static str,
    pub years_loaded: usize,
    pub failed_years: Vec<i32>,
    pub movies_catalogued: usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct ErrorData {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::models::{Genre, MovieRecord};

    fn registry() -> MovieRegistry {
        MovieRegistry::from_records(vec![
            MovieRecord {
                name: String::from("Heist"),
                genre: Genre::Crime,
                ..MovieRecord::default()
            },
            MovieRecord {
                name: String::from("Tears"),
                genre: Genre::Drama,
                ..MovieRecord::default()
            },
        ])
    }

    fn layer(movie: &str) -> StackLayer {
        StackLayer {
            movie: movie.to_string(),
            points: vec![BandPoint {
                week: 1,
                lower: 0.0,
                upper: 2.0,
            }],
        }
    }

    #[test]
    fn test_total_selection_dims_nothing() {
        let registry = registry();
        let decorated = LayerData::decorate(layer("Heist"), &registry, "Total");
        assert!(!decorated.dimmed);
        assert_eq!(decorated.genre, "Crime");
        assert_eq!(decorated.color, "#C4B8AC");
    }

    #[test]
    fn test_selection_dims_other_genres() {
        let registry = registry();
        let crime = LayerData::decorate(layer("Heist"), &registry, "Crime");
        let drama = LayerData::decorate(layer("Tears"), &registry, "Crime");
        assert!(!crime.dimmed);
        assert!(drama.dimmed);
    }

    #[test]
    fn test_unknown_selection_dims_everything() {
        let registry = registry();
        let crime = LayerData::decorate(layer("Heist"), &registry, "Bogus");
        let drama = LayerData::decorate(layer("Tears"), &registry, "Bogus");
        assert!(crime.dimmed);
        assert!(drama.dimmed);
    }

    #[test]
    fn test_uncatalogued_layer_renders_as_unknown() {
        let registry = registry();
        let decorated = LayerData::decorate(layer("Ghost"), &registry, "Total");
        assert_eq!(decorated.genre, "Unknown");
        assert_eq!(decorated.color, "#aaa");
    }

    #[test]
    fn test_ranking_entries_carry_genre_and_color() {
        let registry = registry();
        let entries = RankingEntry::decorate(
            vec![
                (String::from("Tears"), 900.0),
                (String::from("Ghost"), 100.0),
            ],
            &registry,
        );
        assert_eq!(entries[0].genre, "Drama");
        assert_eq!(entries[0].color, "#FFAE56");
        assert_eq!(entries[1].genre, "Unknown");
        assert_eq!(entries[1].total, 100.0);
    }

    #[test]
    fn test_bucket_data_keeps_etc_tag() {
        let bucket = GenreBucket {
            genre: Genre::Etc,
            revenue: 20_000.0,
            count: 3,
        };
        let data = GenreBucketData::from_bucket(&bucket);
        assert_eq!(data.genre, "etc");
        assert_eq!(data.color, "#aaa");
        assert_eq!(data.count, 3);
    }

    #[test]
    fn test_layer_wire_shape() {
        let registry = registry();
        let decorated = LayerData::decorate(layer("Heist"), &registry, "Total");
        let json = serde_json::to_value(&decorated).unwrap();

        assert_eq!(json["movie"], "Heist");
        assert_eq!(json["genre"], "Crime");
        assert_eq!(json["color"], "#C4B8AC");
        assert_eq!(json["dimmed"], false);
        assert_eq!(json["points"][0]["week"], 1);
        assert_eq!(json["points"][0]["lower"], 0.0);
        assert_eq!(json["points"][0]["upper"], 2.0);
    }
}
