//! Open-Meteo provider against a mock HTTP server

use std::time::Duration;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use kitecast::config::WeatherConfig;
use kitecast::kitesurf::spots::Coordinates;
use kitecast::weather::{ProviderError, WeatherCondition};
use kitecast::{OpenMeteoProvider, WeatherProvider};

const SCHEVENINGEN: Coordinates = Coordinates {
    lat: 52.1106,
    lng: 4.2779,
};

fn provider(server: &MockServer, timeout_seconds: u64) -> OpenMeteoProvider {
    let config = WeatherConfig {
        base_url: server.uri(),
        timeout_seconds,
        ..WeatherConfig::default()
    };
    OpenMeteoProvider::new(&config).unwrap()
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn current_block() -> serde_json::Value {
    json!({
        "latitude": 52.1,
        "longitude": 4.3,
        "timezone": "Europe/Amsterdam",
        "current": {
            "time": "2025-06-01T12:00",
            "interval": 900,
            "temperature_2m": 18.4,
            "relative_humidity_2m": 77,
            "surface_pressure": 1011.2,
            "weather_code": 61,
            "wind_speed_10m": 17.5,
            "wind_direction_10m": 243,
            "wind_gusts_10m": 24.1
        }
    })
}

#[tokio::test]
async fn test_current_conditions_in_knots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("wind_speed_unit", "kn"))
        .and(query_param("timezone", "Europe/Amsterdam"))
        .and(query_param("latitude", "52.1106"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_block()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = provider(&server, 8).fetch_current(&SCHEVENINGEN).await.unwrap();

    assert_eq!(snapshot.wind_speed, 17.5);
    assert_eq!(snapshot.wind_direction, 243.0);
    assert_eq!(snapshot.wind_gust, 24.1);
    assert_eq!(snapshot.weather_condition, WeatherCondition::LightRain);
    assert_eq!(snapshot.weather_icon, "10d");
}

#[tokio::test]
async fn test_server_error_is_status() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("Internal Server Error")).await;

    let result = provider(&server, 8).fetch_current(&SCHEVENINGEN).await;
    assert!(
        matches!(result, Err(ProviderError::Status(500))),
        "Expected Status(500), got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_string("{\"current\": {\"wind_speed_10m\": "),
    )
    .await;

    let result = provider(&server, 8).fetch_current(&SCHEVENINGEN).await;
    assert!(
        matches!(result, Err(ProviderError::Parse(_))),
        "Expected Parse, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_current_block_is_parse_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"latitude": 52.1, "longitude": 4.3})),
    )
    .await;

    let result = provider(&server, 8).fetch_current(&SCHEVENINGEN).await;
    assert!(
        matches!(result, Err(ProviderError::Parse(ref m)) if m.contains("current")),
        "Expected Parse, got: {result:?}"
    );
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(current_block())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let result = provider(&server, 1).fetch_current(&SCHEVENINGEN).await;
    assert!(
        matches!(result, Err(ProviderError::Timeout(_))),
        "Expected Timeout, got: {result:?}"
    );
}
