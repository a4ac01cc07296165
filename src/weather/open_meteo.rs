//! Open-Meteo current-conditions client
//!
//! Open-Meteo needs no API key. Wind is requested in knots so the values
//! can be compared with the spot catalog directly.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{ProviderError, WeatherCondition, WeatherProvider, WeatherSnapshot, weather_icon};
use crate::config::WeatherConfig;
use crate::error::KitecastError;
use crate::kitesurf::spots::Coordinates;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,surface_pressure,weather_code,wind_speed_10m,wind_direction_10m,wind_gusts_10m";

const DEFAULT_TEMPERATURE: f64 = 15.0;
const DEFAULT_PRESSURE: f64 = 1013.0;
const DEFAULT_HUMIDITY: f64 = 70.0;
/// Open-Meteo has no visibility in the current block.
const FIXED_VISIBILITY: f64 = 10_000.0;

pub struct OpenMeteoProvider {
    client: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoProvider {
    pub fn new(config: &WeatherConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("kitecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KitecastError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    fn forecast_url(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current={}&wind_speed_unit=kn&timezone={}",
            self.base_url, coordinates.lat, coordinates.lng, CURRENT_FIELDS, self.timezone
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    #[instrument(name = "open_meteo_current", skip(self), fields(lat = coordinates.lat, lng = coordinates.lng))]
    async fn fetch_current(
        &self,
        coordinates: &Coordinates,
    ) -> Result<WeatherSnapshot, ProviderError> {
        let url = self.forecast_url(coordinates);
        debug!("Calling the API");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body: ForecastResponse = response.json().await?;
        let current = body
            .current
            .ok_or_else(|| ProviderError::Parse("response has no current block".to_string()))?;

        Ok(current.into_snapshot())
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(rename = "temperature_2m")]
    temperature: Option<f64>,
    #[serde(rename = "relative_humidity_2m")]
    humidity: Option<f64>,
    #[serde(rename = "surface_pressure")]
    pressure: Option<f64>,
    weather_code: Option<i64>,
    #[serde(rename = "wind_speed_10m")]
    wind_speed: Option<f64>,
    #[serde(rename = "wind_direction_10m")]
    wind_direction: Option<f64>,
    #[serde(rename = "wind_gusts_10m")]
    wind_gusts: Option<f64>,
}

impl CurrentData {
    /// Fill gaps with fixed defaults; a missing gust falls back to the mean wind.
    fn into_snapshot(self) -> WeatherSnapshot {
        let wind_speed = self.wind_speed.unwrap_or(0.0);
        let (weather_condition, weather_icon) = match self.weather_code {
            Some(code) => (WeatherCondition::from_wmo_code(code), weather_icon(code)),
            None => (WeatherCondition::Unknown, "01d"),
        };

        WeatherSnapshot {
            timestamp: Utc::now(),
            wind_speed,
            wind_direction: self.wind_direction.unwrap_or(0.0),
            wind_gust: self.wind_gusts.unwrap_or(wind_speed),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            pressure: self.pressure.unwrap_or(DEFAULT_PRESSURE),
            humidity: self.humidity.unwrap_or(DEFAULT_HUMIDITY),
            weather_condition,
            weather_icon: weather_icon.to_string(),
            visibility: Some(FIXED_VISIBILITY),
        }
    }
}
