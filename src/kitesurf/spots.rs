//! Kitesurf spot data types and the static spot catalog
//!
//! Spots are loaded once at startup, validated, and never mutated
//! afterwards. The default catalog is compiled into the binary; a JSON file
//! with the same layout can be configured instead.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::direction::Cardinal;
use crate::error::KitecastError;

const EMBEDDED_CATALOG: &str = include_str!("spots.json");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterType {
    Sea,
    Lake,
    River,
}

impl std::str::FromStr for WaterType {
    type Err = KitecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sea" => Ok(WaterType::Sea),
            "lake" => Ok(WaterType::Lake),
            "river" => Ok(WaterType::River),
            other => Err(KitecastError::validation(format!(
                "unknown water type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchType {
    Beach,
    Grass,
    Concrete,
}

/// A named kitesurf location with its static suitability parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: String,
    pub name: String,
    pub region: String,
    pub coordinates: Coordinates,
    /// Directions the spot works with; never empty once validated
    pub wind_directions: Vec<Cardinal>,
    pub tide_dependent: bool,
    /// Minimum rideable wind in knots
    pub min_wind_speed: f64,
    /// Maximum rideable wind in knots
    pub max_wind_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facilities: Vec<String>,
    pub water_type: WaterType,
    pub launch_type: LaunchType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hazards: Vec<String>,
}

impl Spot {
    #[must_use]
    pub fn accepts(&self, direction: Cardinal) -> bool {
        self.wind_directions.contains(&direction)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.id.trim().is_empty() {
            return Err(KitecastError::catalog(format!(
                "spot '{}' has an empty id",
                self.name
            )));
        }
        if self.wind_directions.is_empty() {
            return Err(KitecastError::catalog(format!(
                "spot '{}' has no wind directions",
                self.id
            )));
        }
        if !(self.min_wind_speed.is_finite()
            && self.max_wind_speed.is_finite()
            && self.min_wind_speed >= 0.0
            && self.min_wind_speed <= self.max_wind_speed)
        {
            return Err(KitecastError::catalog(format!(
                "spot '{}' has an invalid wind range {}-{}",
                self.id, self.min_wind_speed, self.max_wind_speed
            )));
        }
        if !(-90.0..=90.0).contains(&self.coordinates.lat)
            || !(-180.0..=180.0).contains(&self.coordinates.lng)
        {
            return Err(KitecastError::catalog(format!(
                "spot '{}' has out of range coordinates ({}, {})",
                self.id, self.coordinates.lat, self.coordinates.lng
            )));
        }
        Ok(())
    }
}

/// Immutable, validated list of spots shared by every request
#[derive(Debug, Clone)]
pub struct SpotCatalog {
    spots: Arc<[Spot]>,
}

impl SpotCatalog {
    /// Build a catalog from already parsed spots.
    pub fn new(spots: Vec<Spot>) -> crate::Result<Self> {
        let mut seen = HashSet::new();
        for spot in &spots {
            spot.validate()?;
            if !seen.insert(spot.id.as_str()) {
                return Err(KitecastError::catalog(format!(
                    "duplicate spot id '{}'",
                    spot.id
                )));
            }
        }
        Ok(Self {
            spots: spots.into(),
        })
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let spots: Vec<Spot> = serde_json::from_str(json)
            .map_err(|e| KitecastError::catalog(format!("failed to parse catalog: {e}")))?;
        Self::new(spots)
    }

    /// The catalog shipped with the binary.
    pub fn embedded() -> crate::Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!("Loaded {} spots from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load the configured catalog file, or the embedded one when none is set.
    pub fn load(path: Option<&str>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let catalog = Self::embedded()?;
                info!("Loaded {} embedded spots", catalog.len());
                Ok(catalog)
            }
        }
    }

    #[must_use]
    pub fn all(&self) -> &[Spot] {
        &self.spots
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Spot> {
        self.spots.iter().find(|spot| spot.id == id)
    }

    #[must_use]
    pub fn in_region(&self, region: &str) -> Vec<Spot> {
        self.spots
            .iter()
            .filter(|spot| spot.region == region)
            .cloned()
            .collect()
    }

    /// Distinct regions in catalog order.
    #[must_use]
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for spot in self.spots.iter() {
            if !regions.contains(&spot.region.as_str()) {
                regions.push(&spot.region);
            }
        }
        regions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_spot(id: &str, lat: f64, lng: f64) -> Spot {
    Spot {
        id: id.to_string(),
        name: format!("Spot {id}"),
        region: "Zuid-Holland".to_string(),
        coordinates: Coordinates { lat, lng },
        wind_directions: vec![Cardinal::SW, Cardinal::W, Cardinal::NW],
        tide_dependent: false,
        min_wind_speed: 12.0,
        max_wind_speed: 30.0,
        description: None,
        restrictions: vec![],
        facilities: vec![],
        water_type: WaterType::Sea,
        launch_type: LaunchType::Beach,
        hazards: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = SpotCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.all().iter().all(|s| !s.wind_directions.is_empty()));
        assert_eq!(
            catalog.regions(),
            vec!["Zuid-Holland", "Noord-Holland", "Zeeland", "Friesland", "Flevoland"]
        );
    }

    #[test]
    fn test_find_and_region() {
        let catalog = SpotCatalog::embedded().unwrap();
        let spot = catalog.find("scheveningen").unwrap();
        assert_eq!(spot.region, "Zuid-Holland");
        assert!(catalog.find("atlantis").is_none());
        assert!(catalog
            .in_region("Zeeland")
            .iter()
            .all(|s| s.region == "Zeeland"));
    }

    #[test]
    fn test_missing_catalog_file_is_io_error() {
        let err = SpotCatalog::load(Some("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, KitecastError::Io { .. }));
    }

    #[test]
    fn test_rejects_empty_directions() {
        let mut spot = test_spot("a", 52.0, 4.0);
        spot.wind_directions.clear();
        let err = SpotCatalog::new(vec![spot]).unwrap_err();
        assert!(err.to_string().contains("no wind directions"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = SpotCatalog::new(vec![test_spot("a", 52.0, 4.0), test_spot("a", 53.0, 5.0)])
            .unwrap_err();
        assert!(matches!(err, KitecastError::Catalog { .. }));
    }

    #[test]
    fn test_rejects_inverted_wind_range() {
        let mut spot = test_spot("a", 52.0, 4.0);
        spot.min_wind_speed = 30.0;
        spot.max_wind_speed = 10.0;
        assert!(SpotCatalog::new(vec![spot]).is_err());
    }

    #[test]
    fn test_catalog_json_field_names() {
        let json = r#"[{
            "id": "x", "name": "X", "region": "Zeeland",
            "coordinates": {"lat": 51.5, "lng": 3.5},
            "windDirections": ["SW", "W"], "tideDependent": true,
            "minWindSpeed": 12, "maxWindSpeed": 30,
            "waterType": "sea", "launchType": "beach"
        }]"#;
        let catalog = SpotCatalog::from_json(json).unwrap();
        let spot = catalog.find("x").unwrap();
        assert!(spot.tide_dependent);
        assert!(spot.accepts(Cardinal::W));
        assert!(spot.hazards.is_empty());
    }
}
