//! Kiteability scoring for a spot under current weather
//!
//! The score rewards wind near the middle of the spot's range, wind from one
//! of its directions (with partial credit for a neighbouring direction) and
//! steady wind. The boolean verdict is stricter: it accepts only the listed
//! directions, so a spot can score above zero and still not be kiteable.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::direction::{Cardinal, to_cardinal};
use super::spots::Spot;
use crate::weather::Observation;

const STRENGTH_POINTS: f64 = 40.0;
const DIRECTION_POINTS: f64 = 40.0;
const ADJACENT_DIRECTION_POINTS: f64 = 20.0;
const STEADY_GUST_POINTS: f64 = 20.0;
const MODERATE_GUST_POINTS: f64 = 10.0;

/// Gust-to-mean ratio below which wind counts as steady.
const STEADY_GUST_RATIO: f64 = 1.2;
/// Gust-to-mean ratio from which wind counts as very gusty.
const GUSTY_RATIO: f64 = 1.5;
/// Knots above which a strong-wind warning is raised.
const STRONG_WIND_KNOTS: f64 = 25.0;

/// Score in `[0, 100]` for riding at a spot right now.
///
/// Returns exactly 0 when `wind_speed` is outside `[min_wind, max_wind]`.
#[must_use]
pub fn kiteability_score(
    wind_speed: f64,
    wind_direction: f64,
    acceptable_directions: &[Cardinal],
    min_wind: f64,
    max_wind: f64,
    gust: f64,
) -> f64 {
    if !in_range(wind_speed, min_wind, max_wind) {
        return 0.0;
    }

    let score = strength_points(wind_speed, min_wind, max_wind)
        + direction_points(wind_direction, acceptable_directions)
        + gust_points(wind_speed, gust);

    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Whether the wind is in range and from one of the spot's own directions.
#[must_use]
pub fn is_kiteable(
    wind_speed: f64,
    wind_direction: f64,
    acceptable_directions: &[Cardinal],
    min_wind: f64,
    max_wind: f64,
) -> bool {
    in_range(wind_speed, min_wind, max_wind)
        && acceptable_directions.contains(&to_cardinal(wind_direction))
}

fn in_range(wind_speed: f64, min_wind: f64, max_wind: f64) -> bool {
    wind_speed >= min_wind && wind_speed <= max_wind
}

/// Up to 40 points, falling off linearly away from the middle of the range.
/// Goes negative far from the middle; the final clamp absorbs that.
fn strength_points(wind_speed: f64, min_wind: f64, max_wind: f64) -> f64 {
    let mid = (min_wind + max_wind) / 2.0;
    if mid <= 0.0 {
        return 0.0;
    }
    STRENGTH_POINTS * (1.0 - (wind_speed - mid).abs() / mid)
}

fn direction_points(wind_direction: f64, acceptable_directions: &[Cardinal]) -> f64 {
    let cardinal = to_cardinal(wind_direction);
    if acceptable_directions.contains(&cardinal) {
        DIRECTION_POINTS
    } else if cardinal
        .adjacent()
        .iter()
        .any(|neighbour| acceptable_directions.contains(neighbour))
    {
        ADJACENT_DIRECTION_POINTS
    } else {
        0.0
    }
}

fn gust_points(wind_speed: f64, gust: f64) -> f64 {
    let ratio = gust / wind_speed;
    if ratio < STEADY_GUST_RATIO {
        STEADY_GUST_POINTS
    } else if ratio < GUSTY_RATIO {
        MODERATE_GUST_POINTS
    } else {
        0.0
    }
}

/// Advisory attached to an assessment, independent of the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionWarning {
    #[serde(rename = "Very gusty conditions")]
    VeryGusty,
    #[serde(rename = "Strong wind conditions")]
    StrongWind,
    #[serde(rename = "Wind below minimum for this spot")]
    BelowMinimum,
    #[serde(rename = "Check tide conditions before going")]
    CheckTide,
}

impl fmt::Display for ConditionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConditionWarning::VeryGusty => "Very gusty conditions",
            ConditionWarning::StrongWind => "Strong wind conditions",
            ConditionWarning::BelowMinimum => "Wind below minimum for this spot",
            ConditionWarning::CheckTide => "Check tide conditions before going",
        };
        f.write_str(text)
    }
}

/// Every warning that applies, in a fixed order.
#[must_use]
pub fn warnings(spot: &Spot, wind_speed: f64, gust: f64) -> Vec<ConditionWarning> {
    let mut warnings = Vec::new();
    if gust > wind_speed * GUSTY_RATIO {
        warnings.push(ConditionWarning::VeryGusty);
    }
    if wind_speed > STRONG_WIND_KNOTS {
        warnings.push(ConditionWarning::StrongWind);
    }
    if wind_speed < spot.min_wind_speed {
        warnings.push(ConditionWarning::BelowMinimum);
    }
    if spot.tide_dependent {
        warnings.push(ConditionWarning::CheckTide);
    }
    warnings
}

/// Rough wind strength band in knots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindStrength {
    /// Below 12 kn
    Light,
    /// 12 to 20 kn
    Moderate,
    /// 20 to 28 kn
    Strong,
    /// 28 kn and more
    Extreme,
}

impl WindStrength {
    #[must_use]
    pub fn from_speed(knots: f64) -> Self {
        match knots {
            s if s < 12.0 => WindStrength::Light,
            s if s < 20.0 => WindStrength::Moderate,
            s if s < 28.0 => WindStrength::Strong,
            _ => WindStrength::Extreme,
        }
    }
}

/// A spot paired with its current weather and the derived verdicts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionAssessment {
    pub spot: Spot,
    pub weather: Observation,
    pub is_kiteable: bool,
    pub kiteability: f64,
    pub wind_strength: WindStrength,
    pub warnings: Vec<ConditionWarning>,
}

impl ConditionAssessment {
    #[must_use]
    pub fn assess(spot: &Spot, weather: Observation) -> Self {
        let speed = weather.wind_speed();
        let direction = weather.wind_direction();
        let gust = weather.wind_gust();

        Self {
            is_kiteable: is_kiteable(
                speed,
                direction,
                &spot.wind_directions,
                spot.min_wind_speed,
                spot.max_wind_speed,
            ),
            kiteability: kiteability_score(
                speed,
                direction,
                &spot.wind_directions,
                spot.min_wind_speed,
                spot.max_wind_speed,
                gust,
            ),
            wind_strength: WindStrength::from_speed(speed),
            warnings: warnings(spot, speed, gust),
            spot: spot.clone(),
            weather,
        }
    }
}
