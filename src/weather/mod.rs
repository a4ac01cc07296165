//! Weather observations and the provider seam
//!
//! A [`WeatherProvider`] turns a coordinate into a [`WeatherSnapshot`].
//! [`service::WeatherService`] layers the per-spot cache and the synthetic
//! fallback on top of it and hands out spot-stamped [`Observation`]s.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::kitesurf::spots::Coordinates;

pub mod grid;
pub mod open_meteo;
pub mod service;
pub mod synthetic;

pub use grid::{GridKey, group_spots};
pub use open_meteo::OpenMeteoProvider;
pub use service::{ObservationSource, WeatherService};
pub use synthetic::SyntheticWeather;

/// Qualitative weather label shown next to the wind data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Cloudy,
    Foggy,
    Drizzle,
    #[serde(rename = "Light Rain")]
    LightRain,
    Rain,
    Snow,
    Showers,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Map a WMO weather interpretation code onto a label.
    ///
    /// Codes are bucketed by ascending upper bound; anything above 99 is
    /// unknown.
    #[must_use]
    pub fn from_wmo_code(code: i64) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            c if c <= 3 => WeatherCondition::PartlyCloudy,
            c if c <= 48 => WeatherCondition::Foggy,
            c if c <= 57 => WeatherCondition::Drizzle,
            c if c <= 67 => WeatherCondition::Rain,
            c if c <= 77 => WeatherCondition::Snow,
            c if c <= 82 => WeatherCondition::Showers,
            c if c <= 99 => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Foggy => "Foggy",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::LightRain => "Light Rain",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Showers => "Showers",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon identifier for a WMO code, in the OpenWeatherMap icon naming scheme
#[must_use]
pub fn weather_icon(code: i64) -> &'static str {
    match code {
        0 => "01d",
        c if c <= 3 => "02d",
        c if c <= 48 => "50d",
        c if c <= 67 => "10d",
        c if c <= 77 => "13d",
        c if c <= 99 => "11d",
        _ => "01d",
    }
}

/// Weather at one coordinate, independent of which spot asked for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Wind speed in knots
    pub wind_speed: f64,
    /// Wind direction in degrees, 0 is north
    pub wind_direction: f64,
    /// Gust speed in knots
    pub wind_gust: f64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Pressure in hPa
    pub pressure: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    pub weather_condition: WeatherCondition,
    pub weather_icon: String,
    /// Visibility in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

/// A weather snapshot assigned to a spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub spot_id: String,
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
}

impl Observation {
    #[must_use]
    pub fn new(spot_id: impl Into<String>, snapshot: WeatherSnapshot) -> Self {
        Self {
            spot_id: spot_id.into(),
            snapshot,
        }
    }

    /// Same weather, different spot.
    #[must_use]
    pub fn for_spot(&self, spot_id: &str) -> Self {
        Self {
            spot_id: spot_id.to_string(),
            snapshot: self.snapshot.clone(),
        }
    }

    #[must_use]
    pub fn wind_speed(&self) -> f64 {
        self.snapshot.wind_speed
    }

    #[must_use]
    pub fn wind_direction(&self) -> f64 {
        self.snapshot.wind_direction
    }

    #[must_use]
    pub fn wind_gust(&self) -> f64 {
        self.snapshot.wind_gust
    }
}

/// Why a provider could not deliver current weather
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Status(status.as_u16())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Source of current weather for a coordinate
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch the instantaneous conditions at `coordinates`.
    ///
    /// Exactly one attempt is made; callers decide what to do on failure.
    async fn fetch_current(
        &self,
        coordinates: &Coordinates,
    ) -> Result<WeatherSnapshot, ProviderError>;
}
