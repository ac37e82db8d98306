//! HTTP transport: JSON weather endpoints plus health and log views.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;
use crate::events::{log_text, FileEventLog};
use crate::resolver::WeatherResolver;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: WeatherResolver,
    pub event_log: Option<FileEventLog>,
}

/// Query params for the weather endpoints
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(default)]
    pub city: Option<String>,
}

/// Query params for logs
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub lines: Option<usize>,
}

/// JSON response for health checks
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

fn city_required() -> Response {
    (StatusCode::BAD_REQUEST, "City parameter is required").into_response()
}

fn error_response(err: WeatherError) -> Response {
    if err.is_invalid_input() {
        return city_required();
    }
    tracing::error!("Unexpected resolver error: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {err}")).into_response()
}

/// GET /current?city=<name>
async fn current(State(state): State<AppState>, Query(query): Query<CityQuery>) -> Response {
    let Some(city) = query.city else {
        return city_required();
    };
    match state.resolver.resolve_current(&city).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /forecast?city=<name>
async fn forecast(State(state): State<AppState>, Query(query): Query<CityQuery>) -> Response {
    let Some(city) = query.city else {
        return city_required();
    };
    match state.resolver.resolve_forecast(&city).await {
        Ok(report) => Json(report.forecast).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /logs?lines=<n>
async fn logs(State(state): State<AppState>, Query(query): Query<LogsQuery>) -> Response {
    let text = log_text(state.event_log.as_ref(), query.lines);
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "weather-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/current", get(current))
        .route("/forecast", get(forecast))
        .route("/logs", get(logs))
        .with_state(state)
}

/// Run the HTTP server until the process is stopped
pub async fn run_http_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Weather HTTP server listening on port {}", port);
    tracing::info!("  GET /current?city=<name>   current weather");
    tracing::info!("  GET /forecast?city=<name>  5-day forecast");
    tracing::info!("  GET /logs                  event log");

    axum::serve(listener, app).await?;
    Ok(())
}
