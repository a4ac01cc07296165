//! Synthetic weather used when the live provider is unavailable
//!
//! The numbers are plausible for the Dutch coast: wind scales with latitude,
//! drifts with a slow sine over the hour, and comes from the south-west
//! with some spread. It never claims to be real data and is never cached.

use chrono::{DateTime, Utc};
use rand::RngExt;

use super::{WeatherCondition, WeatherSnapshot};
use crate::kitesurf::spots::Coordinates;

/// Latitude and longitude the coordinate factors are normalized around.
const REFERENCE_LAT: f64 = 52.0;
const REFERENCE_LNG: f64 = 5.0;
/// Prevailing wind (SW) in degrees.
const PREVAILING_DIRECTION: f64 = 225.0;
const MIN_WIND: f64 = 5.0;
const MAX_WIND: f64 = 30.0;
const SYNTHETIC_VISIBILITY: f64 = 10_000.0;

const CONDITIONS: [WeatherCondition; 4] = [
    WeatherCondition::Clear,
    WeatherCondition::PartlyCloudy,
    WeatherCondition::Cloudy,
    WeatherCondition::LightRain,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticWeather;

impl SyntheticWeather {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generate a snapshot for `coordinates` at time `now`.
    #[must_use]
    pub fn generate(&self, coordinates: &Coordinates, now: DateTime<Utc>) -> WeatherSnapshot {
        let mut rng = rand::rng();

        let lat_factor = coordinates.lat / REFERENCE_LAT;
        let lng_factor = coordinates.lng / REFERENCE_LNG;
        let drift = time_drift(now);

        let base_wind = 10.0 + lat_factor * 8.0 + drift * 5.0;
        let wind_speed = (base_wind + rng.random_range(0.0..10.0)).clamp(MIN_WIND, MAX_WIND);

        let wind_direction = (PREVAILING_DIRECTION + lng_factor * 45.0 + rng.random_range(0.0..90.0))
            .rem_euclid(360.0)
            .round()
            % 360.0;

        WeatherSnapshot {
            timestamp: now,
            wind_speed,
            wind_direction,
            wind_gust: wind_speed + rng.random_range(0.0..5.0),
            temperature: 12.0 + rng.random_range(0.0..10.0) + drift * 5.0,
            pressure: 1010.0 + rng.random_range(0.0..20.0),
            humidity: 60.0 + rng.random_range(0.0..30.0),
            weather_condition: CONDITIONS[rng.random_range(0..CONDITIONS.len())],
            weather_icon: "02d".to_string(),
            visibility: Some(SYNTHETIC_VISIBILITY),
        }
    }
}

/// Slow sine over wall-clock time, one radian per hour.
fn time_drift(now: DateTime<Utc>) -> f64 {
    let hours = now.timestamp_millis() as f64 / 3_600_000.0;
    hours.sin()
}
