//! Kitesurf domain module
//!
//! This module provides the kitesurf-specific logic:
//! - The static spot catalog
//! - Compass direction helpers
//! - Kiteability scoring and warnings for a spot under current weather
//! - Kite size recommendations for a rider
//! - Filtering and ranking of spot assessments

pub mod direction;
pub mod filter;
pub mod kite_size;
pub mod kiteability;
pub mod spots;

// Re-export commonly used types from submodules
pub use direction::{Cardinal, to_cardinal};
pub use filter::SpotFilter;
pub use kite_size::{
    Discipline, DisciplineFactor, KiteRecommendation, RideConditions, RiderPreferences,
    SkillLevel, recommend,
};
pub use kiteability::{
    ConditionAssessment, ConditionWarning, WindStrength, is_kiteable, kiteability_score,
};
pub use spots::{Coordinates, LaunchType, Spot, SpotCatalog, WaterType};
