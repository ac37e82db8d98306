//! End-to-end tests for the HTTP transport
//!
//! Each test binds the router on an ephemeral port and talks to it with
//! reqwest, while Open-Meteo is replaced by a wiremock server.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use weather_gateway::events::NullSink;
use weather_gateway::http::{create_router, AppState, HealthResponse};
use weather_gateway::{FileEventLog, RetryPolicy, WeatherConfig, WeatherResolver};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn spawn_app(mock_server: &MockServer, event_log: Option<FileEventLog>) -> SocketAddr {
    let config = WeatherConfig {
        geo_base_url: mock_server.uri(),
        weather_base_url: mock_server.uri(),
        timeout_ms: 1_000,
        retry: RetryPolicy::new(2, 5),
        ..WeatherConfig::default()
    };
    let events: Arc<dyn weather_gateway::EventSink> = match &event_log {
        Some(log) => Arc::new(log.clone()),
        None => Arc::new(NullSink),
    };
    let resolver = WeatherResolver::from_config(&config, events).unwrap();
    let app = create_router(AppState {
        resolver,
        event_log,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn mount_berlin(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "name": "Berlin", "latitude": 52.52, "longitude": 13.41 }]
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let mock_server = MockServer::start().await;
    let addr = spawn_app(&mock_server, None).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), 200);

    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.service, "weather-service");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_missing_or_blank_city_is_bad_request() {
    let mock_server = MockServer::start().await;
    let addr = spawn_app(&mock_server, None).await;

    for url in [
        format!("http://{addr}/current"),
        format!("http://{addr}/current?city="),
        format!("http://{addr}/forecast?city=%20%20"),
        format!("http://{addr}/forecast?city=in"),
    ] {
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), 400, "{url}");
        assert_eq!(response.text().await.unwrap(), "City parameter is required");
    }
}

#[tokio::test]
async fn test_current_endpoint_returns_upstream_json() {
    let mock_server = MockServer::start().await;
    mount_berlin(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("current_weather", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_weather": {
                "time": "2024-01-15T12:00",
                "temperature": 5.5,
                "windspeed": 12.5,
                "winddirection": 225,
                "weathercode": 3
            }
        })))
        .mount(&mock_server)
        .await;
    let addr = spawn_app(&mock_server, None).await;

    let response = reqwest::get(format!("http://{addr}/current?city=in%20Berlin"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["source"], "upstream");
    assert!(body.get("note").is_none());
    assert_eq!(body["data"]["city"], "Berlin");
    assert_eq!(body["data"]["temperatureC"], 5.5);
}

#[tokio::test]
async fn test_forecast_endpoint_falls_back_to_mock() {
    let mock_server = MockServer::start().await;
    mount_berlin(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;
    let addr = spawn_app(&mock_server, None).await;

    let response = reqwest::get(format!("http://{addr}/forecast?city=Berlin"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["source"], "mock");
    assert!(body["note"].as_str().is_some_and(|n| !n.is_empty()));

    let days = body["data"].as_array().unwrap();
    assert_eq!(days.len(), 5);
    for day in days {
        assert!(day["minTempC"].as_f64().unwrap() <= day["maxTempC"].as_f64().unwrap());
    }
}

#[tokio::test]
async fn test_logs_endpoint_without_log_file() {
    let mock_server = MockServer::start().await;
    let addr = spawn_app(&mock_server, None).await;

    let response = reqwest::get(format!("http://{addr}/logs")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("No event log configured"));
}

#[tokio::test]
async fn test_logs_endpoint_shows_recorded_events() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = FileEventLog::new(dir.path().join("events.log"));
    let addr = spawn_app(&mock_server, Some(log)).await;

    let response = reqwest::get(format!("http://{addr}/current?city=Atlantis"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let text = reqwest::get(format!("http://{addr}/logs?lines=10"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(text.contains("Atlantis"), "{text}");
    assert!(text.contains("[INFO] [resolver]"), "{text}");
}
