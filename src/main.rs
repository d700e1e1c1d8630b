mod adapters;
mod api;
mod config;
mod core_logic;
mod registry;

use adapters::movie_metadata::fetch_movie_registry;
use adapters::weekly_tables::WeeklyRawTable;
use adapters::{preload_weekly_tables, DataSource};
use api::lib::{chart_weight_params, overall_weight_params, selected_genre, snap_gauge};
use api::models::{
    ChartParameters, ErrorData, GaugeData, GaugeParameters, GenreBreakdownData, GenreBucketData,
    HealthData, LayerData, OverallData, OverallParameters, RankingData, RankingEntry,
    StreamgraphData,
};
use config::Config;
use core_logic::aggregation::{aggregate_overall, genre_buckets, GENRE_SHARE_THRESHOLD};
use core_logic::series::build_year_series;
use core_logic::session::RecomputeSession;
use core_logic::stacking::{appearance_order, stack_layers, y_domain_max};
use core_logic::weighting::WeightParams;
use core_logic::EngineError;
use registry::{MovieRegistry, RatingRank};

use chrono::Utc;
use dotenv::dotenv;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::Filter;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Result of one overall recompute. The session keeps the newest one so
/// repeat requests with the same factors reuse it instead of recomputing.
struct OverallSnapshot {
    params: WeightParams,
    data: OverallData,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    let source = DataSource::from_location(&config.data_source);
    info!(
        ?source,
        start_year = config.start_year,
        end_year = config.end_year,
        "starting engine"
    );

    let registry = match fetch_movie_registry(&source, &config.metadata_file).await {
        Ok(registry) => registry,
        Err(load_error) => {
            error!(
                error = %load_error,
                file = %config.metadata_file,
                "movie catalogue failed to load, serving without it"
            );
            MovieRegistry::new()
        }
    };
    let ranks = Arc::new(registry.rating_ranks());
    let registry = Arc::new(registry);

    let years = config.years();
    let report = preload_weekly_tables(&source, &years).await;
    info!(
        loaded = report.tables.len(),
        failed = report.failed_years.len(),
        "weekly tables preloaded"
    );
    let tables: Arc<HashMap<i32, WeeklyRawTable>> = Arc::new(report.tables);
    let load_failures = Arc::new(report.failed_years);
    let session: Arc<RecomputeSession<OverallSnapshot>> = Arc::new(RecomputeSession::new());

    let default_year = config.start_year;
    let start_year = config.start_year;
    let end_year = config.end_year;

    let streamgraph_route = warp::path("streamgraph")
        .and(warp::query::<ChartParameters>())
        .map({
            let tables = Arc::clone(&tables);
            let registry = Arc::clone(&registry);
            let ranks = Arc::clone(&ranks);
            move |params: ChartParameters| {
                let year = params.year.unwrap_or(default_year);
                let table = match tables.get(&year) {
                    Some(table) => table,
                    None => return year_unavailable(year),
                };
                let weights = chart_weight_params(&params);
                let selected = selected_genre(&params);
                match streamgraph_payload(table, &registry, &ranks, weights, &selected) {
                    Ok(data) => json_ok(&data),
                    Err(engine_error) => engine_failure(engine_error),
                }
            }
        });

    let genres_route = warp::path("genres")
        .and(warp::query::<ChartParameters>())
        .map({
            let tables = Arc::clone(&tables);
            let registry = Arc::clone(&registry);
            let ranks = Arc::clone(&ranks);
            move |params: ChartParameters| {
                let year = params.year.unwrap_or(default_year);
                let table = match tables.get(&year) {
                    Some(table) => table,
                    None => return year_unavailable(year),
                };
                match genre_payload(table, &registry, &ranks, chart_weight_params(&params)) {
                    Ok(data) => json_ok(&data),
                    Err(engine_error) => engine_failure(engine_error),
                }
            }
        });

    let rankings_route = warp::path("rankings")
        .and(warp::query::<ChartParameters>())
        .map({
            let tables = Arc::clone(&tables);
            let registry = Arc::clone(&registry);
            let ranks = Arc::clone(&ranks);
            move |params: ChartParameters| {
                let year = params.year.unwrap_or(default_year);
                let table = match tables.get(&year) {
                    Some(table) => table,
                    None => return year_unavailable(year),
                };
                match ranking_payload(table, &registry, &ranks, chart_weight_params(&params)) {
                    Ok(data) => json_ok(&data),
                    Err(engine_error) => engine_failure(engine_error),
                }
            }
        });

    let overall_route = warp::path("overall")
        .and(warp::query::<OverallParameters>())
        .map({
            let tables = Arc::clone(&tables);
            let registry = Arc::clone(&registry);
            let ranks = Arc::clone(&ranks);
            let session = Arc::clone(&session);
            let years = years.clone();
            move |params: OverallParameters| {
                let weights = overall_weight_params(&params);
                if let Some((_, snapshot)) = session.latest() {
                    if snapshot.params == weights {
                        return json_ok(&snapshot.data);
                    }
                }

                let ticket = session.begin();
                let overall = aggregate_overall(&years, &tables, &registry, &ranks, weights);
                let data = OverallData {
                    start_year,
                    end_year,
                    entries: RankingEntry::decorate(overall.ranking(), &registry),
                    failed_years: overall.failed_years,
                    generated_at: Utc::now(),
                };
                let snapshot = session.install(
                    ticket,
                    OverallSnapshot {
                        params: weights,
                        data,
                    },
                );
                json_ok(&snapshot.data)
            }
        });

    let gauge_route = warp::path("gauge")
        .and(warp::query::<GaugeParameters>())
        .map(|params: GaugeParameters| {
            let snapped = snap_gauge(
                params.value,
                params.min.unwrap_or(0.0),
                params.max.unwrap_or(100.0),
            );
            json_ok(&GaugeData { value: snapped })
        });

    let health_route = warp::path("health").map({
        let tables = Arc::clone(&tables);
        let load_failures = Arc::clone(&load_failures);
        let registry = Arc::clone(&registry);
        move || {
            json_ok(&HealthData {
                status: "ok",
                years_loaded: tables.len(),
                failed_years: load_failures.as_ref().clone(),
                movies_catalogued: registry.len(),
            })
        }
    });

    // Start the webserver
    let port = config.port;
    info!(port, "starting web server");
    warp::serve(
        streamgraph_route
            .or(genres_route)
            .or(rankings_route)
            .or(overall_route)
            .or(gauge_route)
            .or(health_route),
    )
    .run(([127, 0, 0, 1], port))
    .await;
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn streamgraph_payload(
    table: &WeeklyRawTable,
    registry: &MovieRegistry,
    ranks: &RatingRank,
    weights: WeightParams,
    selected: &str,
) -> Result<StreamgraphData, EngineError> {
    let series = build_year_series(table, registry, ranks, weights)?;
    let order = appearance_order(&series)?;
    let layers = stack_layers(&series, &order)?;
    let y_max = y_domain_max(&layers);
    let ranking = RankingEntry::decorate(series.ranking(), registry);
    let layers = layers
        .into_iter()
        .map(|layer| LayerData::decorate(layer, registry, selected))
        .collect();

    Ok(StreamgraphData {
        year: series.year,
        y_max,
        layers,
        ranking,
        generated_at: Utc::now(),
    })
}

fn genre_payload(
    table: &WeeklyRawTable,
    registry: &MovieRegistry,
    ranks: &RatingRank,
    weights: WeightParams,
) -> Result<GenreBreakdownData, EngineError> {
    let series = build_year_series(table, registry, ranks, weights)?;
    let buckets = genre_buckets(&series.totals, registry, GENRE_SHARE_THRESHOLD);
    let total_revenue = buckets.iter().map(|bucket| bucket.revenue).sum();

    Ok(GenreBreakdownData {
        year: series.year,
        total_revenue,
        buckets: buckets.iter().map(GenreBucketData::from_bucket).collect(),
        generated_at: Utc::now(),
    })
}

fn ranking_payload(
    table: &WeeklyRawTable,
    registry: &MovieRegistry,
    ranks: &RatingRank,
    weights: WeightParams,
) -> Result<RankingData, EngineError> {
    let series = build_year_series(table, registry, ranks, weights)?;

    Ok(RankingData {
        year: series.year,
        entries: RankingEntry::decorate(series.ranking(), registry),
        generated_at: Utc::now(),
    })
}

fn json_ok<T: serde::Serialize>(data: &T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(data), StatusCode::OK)
}

fn year_unavailable(year: i32) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorData {
            error: format!("no weekly table loaded for {}", year),
        }),
        StatusCode::NOT_FOUND,
    )
}

fn engine_failure(engine_error: EngineError) -> warp::reply::WithStatus<warp::reply::Json> {
    error!(error = %engine_error, "request failed");
    warp::reply::with_status(
        warp::reply::json(&ErrorData {
            error: engine_error.to_string(),
        }),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}
