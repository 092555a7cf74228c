use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use citmap::{load_dataset_csv, AggregationConfig, Dataset, Metric, RegionRecord};

#[derive(Clone)]
struct AppState {
    dataset: Arc<Dataset>,
}

#[derive(Debug, Deserialize)]
struct ClassifyQuery {
    value: f64,
}

#[derive(Debug, Serialize)]
struct RegionResponse {
    year: String,
    #[serde(flatten)]
    region: RegionRecord,
    granted: f64,
    refused: f64,
    incoming: f64,
    avg_processing_time: Option<f64>,
}

#[derive(Debug, Serialize)]
struct LabelEntry {
    label: &'static str,
    color: &'static str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let csv_path = std::env::var("CITMAP_CSV").context("CITMAP_CSV must point at the dataset CSV")?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let config = AggregationConfig::from_env();
    let dataset = load_dataset_csv(&csv_path, config)?;
    let state = AppState { dataset: Arc::new(dataset) };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/years", get(years))
        .route("/region/:year/:alpha3", get(region))
        .route("/labels/:metric", get(labels))
        .route("/classify/:metric", get(classify))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid HOST/PORT: {}:{}", host, port))?;
    tracing::info!(%addr, csv = %csv_path, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.context("bind failed")?;
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

async fn years(State(st): State<AppState>) -> impl IntoResponse {
    Json(st.dataset.available_years().to_vec())
}

async fn region(State(st): State<AppState>, Path((year, alpha3)): Path<(String, String)>) -> impl IntoResponse {
    match st.dataset.region_in(&year, &alpha3.to_uppercase()) {
        Some(region) => {
            let resp = RegionResponse {
                year,
                granted: region.granted(),
                refused: region.refused(),
                incoming: region.incoming(),
                avg_processing_time: region.avg_processing_time(),
                region,
            };
            (StatusCode::OK, Json(json!(resp))).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": format!("no data for year {year}")}))).into_response(),
    }
}

async fn labels(State(st): State<AppState>, Path(metric): Path<String>) -> impl IntoResponse {
    let metric: Metric = match metric.parse() {
        Ok(m) => m,
        Err(e) => return (StatusCode::NOT_FOUND, Json(json!({"error": format!("{e}")}))).into_response(),
    };
    let entries: Vec<LabelEntry> = st
        .dataset
        .labels_for(metric)
        .into_iter()
        .map(|(label, color)| LabelEntry { label, color })
        .collect();
    (StatusCode::OK, Json(json!(entries))).into_response()
}

async fn classify(
    State(st): State<AppState>,
    Path(metric): Path<String>,
    Query(q): Query<ClassifyQuery>,
) -> impl IntoResponse {
    let metric: Metric = match metric.parse() {
        Ok(m) => m,
        Err(e) => return (StatusCode::NOT_FOUND, Json(json!({"error": format!("{e}")}))).into_response(),
    };
    let scale = st.dataset.color_scale_for(metric);
    let color = scale.classify(q.value);
    (StatusCode::OK, Json(json!({"metric": metric, "value": q.value, "color": color}))).into_response()
}
