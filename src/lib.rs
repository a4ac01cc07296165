//! Kitecast - live kitesurf spot conditions and kite-size recommendations
//!
//! This library provides the spot catalog, the weather lookup with its
//! cache and synthetic fallback, spot scoring, kite sizing and the HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod kitesurf;
pub mod logging;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::{ApiError, AppState};
pub use cache::WeatherCache;
pub use config::KitecastConfig;
pub use error::KitecastError;
pub use kitesurf::{
    Cardinal, ConditionAssessment, KiteRecommendation, RiderPreferences, Spot, SpotCatalog,
    SpotFilter,
};
pub use weather::{
    Observation, OpenMeteoProvider, WeatherProvider, WeatherService, WeatherSnapshot,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, KitecastError>;
