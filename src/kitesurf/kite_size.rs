//! Kite size recommendation from wind and rider profile

use serde::{Deserialize, Serialize};

pub const MIN_KITE_SIZE: f64 = 4.0;
pub const MAX_KITE_SIZE: f64 = 18.0;
/// Distance of the alternative sizes from the recommendation, in m².
const ALTERNATIVE_STEP: f64 = 2.0;
const KNOTS_FACTOR: f64 = 1.944;

/// Rider skill, ordered from least to most experienced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Less experienced riders get more kite for the same wind.
    #[must_use]
    pub fn size_multiplier(self) -> f64 {
        match self {
            SkillLevel::Beginner => 1.3,
            SkillLevel::Intermediate => 1.15,
            SkillLevel::Advanced => 1.0,
            SkillLevel::Expert => 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Freeride,
    Freestyle,
    Wave,
    Foil,
}

/// Per-discipline tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisciplineFactor {
    /// Multiplier applied to the kite size
    pub power: f64,
    /// Usable wind range of the discipline; not part of the size formula
    pub range: f64,
}

impl Discipline {
    #[must_use]
    pub fn factor(self) -> DisciplineFactor {
        let (power, range) = match self {
            Discipline::Freeride => (1.0, 0.15),
            Discipline::Freestyle => (1.1, 0.1),
            Discipline::Wave => (0.9, 0.2),
            Discipline::Foil => (0.8, 0.25),
        };
        DisciplineFactor { power, range }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderPreferences {
    /// Rider weight in kg
    pub weight: f64,
    pub skill_level: SkillLevel,
    pub discipline: Discipline,
    /// Kite sizes the rider owns or prefers; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kite_range: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideConditions {
    Perfect,
    Good,
    Marginal,
    Dangerous,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KiteRecommendation {
    /// Size in m², a multiple of 0.5 within the supported range
    pub recommended_size: f64,
    pub alternative_sizes: Vec<f64>,
    pub conditions: RideConditions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

/// Recommend a kite for the given wind (knots) and rider.
#[must_use]
pub fn recommend(wind_speed: f64, wind_gust: f64, prefs: &RiderPreferences) -> KiteRecommendation {
    let recommended_size = recommended_size(wind_speed, prefs);
    let alternative_sizes = alternatives(recommended_size);
    let (conditions, warning, confidence) = assess_conditions(wind_speed, wind_gust, prefs.skill_level);

    KiteRecommendation {
        recommended_size,
        alternative_sizes,
        conditions,
        warning: warning.map(str::to_string),
        confidence,
    }
}

fn recommended_size(wind_speed: f64, prefs: &RiderPreferences) -> f64 {
    let wind_in_knots = wind_speed * KNOTS_FACTOR;
    let raw = (prefs.weight * 0.6) / (wind_in_knots * 0.15)
        * prefs.skill_level.size_multiplier()
        * prefs.discipline.factor().power;

    if raw.is_nan() {
        return MIN_KITE_SIZE;
    }
    ((raw * 2.0).round() / 2.0).clamp(MIN_KITE_SIZE, MAX_KITE_SIZE)
}

fn alternatives(size: f64) -> Vec<f64> {
    [
        (size - ALTERNATIVE_STEP).max(MIN_KITE_SIZE),
        (size + ALTERNATIVE_STEP).min(MAX_KITE_SIZE),
    ]
    .into_iter()
    .filter(|alternative| *alternative != size)
    .collect()
}

/// Later rules override earlier ones; the beginner rule always has the last word.
fn assess_conditions(
    wind_speed: f64,
    wind_gust: f64,
    skill_level: SkillLevel,
) -> (RideConditions, Option<&'static str>, f64) {
    let mut verdict = if wind_speed < 10.0 {
        (
            RideConditions::Marginal,
            Some("Wind might be too light for comfortable riding"),
            0.6,
        )
    } else if wind_speed > 30.0 {
        (
            RideConditions::Dangerous,
            Some("Strong wind conditions - only for experienced riders"),
            0.7,
        )
    } else if wind_gust > wind_speed * 1.5 {
        (
            RideConditions::Marginal,
            Some("Very gusty conditions - be careful"),
            0.65,
        )
    } else if (15.0..=25.0).contains(&wind_speed) {
        (RideConditions::Perfect, None, 0.95)
    } else {
        (RideConditions::Good, None, 0.85)
    };

    if skill_level == SkillLevel::Beginner && wind_speed > 20.0 {
        verdict = (
            RideConditions::Dangerous,
            Some("Wind too strong for beginners - consider waiting for lighter conditions"),
            0.9,
        );
    }

    verdict
}
