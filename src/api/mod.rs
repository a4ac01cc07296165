//! Inbound HTTP surface
//!
//! Every successful response is wrapped as `{"data": .., "status": 200}`,
//! every failure as `{"error": .., "status": ..}` (see [`ApiError`]).

mod error;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

pub use error::ApiError;

use crate::kitesurf::{
    ConditionAssessment, Discipline, KiteRecommendation, RiderPreferences, SkillLevel, Spot,
    SpotCatalog, SpotFilter, recommend,
};
use crate::weather::{Observation, WeatherService};

const MISSING_PARAMETERS: &str = "Missing required parameters";
const SPOT_NOT_FOUND: &str = "Spot not found";

const DEFAULT_WEIGHT: f64 = 75.0;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: SpotCatalog,
    pub weather: Arc<WeatherService>,
}

impl AppState {
    pub fn new(catalog: SpotCatalog, weather: WeatherService) -> Self {
        Self {
            catalog,
            weather: Arc::new(weather),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            data,
            status: StatusCode::OK.as_u16(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/regions", get(list_regions))
        .route("/spots", get(list_spots))
        .route("/spots/{id}", get(get_spot))
        .route("/kite-size", post(kite_size))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

async fn list_regions(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    let regions = state
        .catalog
        .regions()
        .into_iter()
        .map(str::to_string)
        .collect();
    ApiResponse::ok(regions)
}

/// Query string of `GET /spots`; everything arrives as text and is parsed
/// into a [`SpotFilter`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotQuery {
    pub region: Option<String>,
    pub kiteable: Option<String>,
    pub directions: Option<String>,
    pub tide_independent: Option<String>,
    pub water_types: Option<String>,
    pub min_kiteability: Option<String>,
}

impl SpotQuery {
    pub fn into_filter(self) -> Result<SpotFilter, ApiError> {
        let min_kiteability = match self.min_kiteability.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                ApiError::BadRequest(format!("invalid minKiteability '{raw}'"))
            })?),
        };

        Ok(SpotFilter {
            region: self.region.filter(|r| !r.is_empty()),
            only_kiteable: is_true(self.kiteable.as_deref()),
            wind_directions: parse_list(self.directions.as_deref())?,
            tide_independent: is_true(self.tide_independent.as_deref()),
            water_types: parse_list(self.water_types.as_deref())?,
            min_kiteability,
        })
    }
}

fn is_true(flag: Option<&str>) -> bool {
    flag == Some("true")
}

fn parse_list<T>(raw: Option<&str>) -> Result<Vec<T>, ApiError>
where
    T: std::str::FromStr<Err = crate::KitecastError>,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<T>().map_err(ApiError::from))
        .collect()
}

async fn list_spots(
    State(state): State<AppState>,
    Query(query): Query<SpotQuery>,
) -> Result<Json<ApiResponse<Vec<ConditionAssessment>>>, ApiError> {
    let filter = query.into_filter()?;

    // Static criteria first so no weather is fetched for spots that cannot match.
    let in_scope = match filter.region.as_deref() {
        Some(region) => state.catalog.in_region(region),
        None => state.catalog.all().to_vec(),
    };
    let candidates: Vec<Spot> = in_scope
        .into_iter()
        .filter(|spot| filter.matches_spot(spot))
        .collect();
    debug!("{} of {} spots pass the static filter", candidates.len(), state.catalog.len());

    let observations = state.weather.observations_for_spots(&candidates).await;
    let assessments = pair_by_id(&candidates, observations)?;

    Ok(ApiResponse::ok(filter.apply(assessments)))
}

/// Observations come back in grid order; match them to spots by id.
fn pair_by_id(
    spots: &[Spot],
    observations: Vec<Observation>,
) -> Result<Vec<ConditionAssessment>, ApiError> {
    let mut by_id: HashMap<String, Observation> = observations
        .into_iter()
        .map(|observation| (observation.spot_id.clone(), observation))
        .collect();

    spots
        .iter()
        .map(|spot| {
            let observation = by_id.remove(&spot.id).ok_or_else(|| {
                ApiError::Internal(format!("no observation for spot '{}'", spot.id))
            })?;
            Ok(ConditionAssessment::assess(spot, observation))
        })
        .collect()
}

async fn get_spot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ConditionAssessment>>, ApiError> {
    let spot = state
        .catalog
        .find(&id)
        .ok_or_else(|| ApiError::NotFound(SPOT_NOT_FOUND.to_string()))?;

    let observation = state.weather.observation_for_spot(spot).await;
    Ok(ApiResponse::ok(ConditionAssessment::assess(spot, observation)))
}

/// Body of `POST /kite-size`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KiteSizeRequest {
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub user_preferences: Option<PreferencesInput>,
}

/// Rider preferences as sent by clients; absent fields get defaults, and so
/// does a weight that is not positive.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesInput {
    pub weight: Option<f64>,
    pub skill_level: Option<SkillLevel>,
    pub discipline: Option<Discipline>,
    pub kite_range: Option<Vec<f64>>,
}

impl From<PreferencesInput> for RiderPreferences {
    fn from(input: PreferencesInput) -> Self {
        RiderPreferences {
            weight: input
                .weight
                .filter(|weight| *weight > 0.0)
                .unwrap_or(DEFAULT_WEIGHT),
            skill_level: input.skill_level.unwrap_or(SkillLevel::Intermediate),
            discipline: input.discipline.unwrap_or(Discipline::Freeride),
            kite_range: input.kite_range,
        }
    }
}

async fn kite_size(
    payload: Result<Json<KiteSizeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<KiteRecommendation>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let (wind_speed, preferences) = match (request.wind_speed, request.user_preferences) {
        (Some(speed), Some(preferences)) if speed > 0.0 => (speed, RiderPreferences::from(preferences)),
        _ => return Err(ApiError::BadRequest(MISSING_PARAMETERS.to_string())),
    };
    let wind_gust = request.wind_gust.unwrap_or(wind_speed);

    Ok(ApiResponse::ok(recommend(wind_speed, wind_gust, &preferences)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitesurf::{Cardinal, WaterType};
    use crate::kitesurf::spots::test_spot;
    use crate::weather::testing::snapshot;

    #[test]
    fn test_query_parsing() {
        let query = SpotQuery {
            region: Some("Zeeland".into()),
            kiteable: Some("true".into()),
            directions: Some("sw, w".into()),
            water_types: Some("sea,lake".into()),
            min_kiteability: Some("40".into()),
            ..SpotQuery::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.region.as_deref(), Some("Zeeland"));
        assert!(filter.only_kiteable);
        assert_eq!(filter.wind_directions, vec![Cardinal::SW, Cardinal::W]);
        assert_eq!(filter.water_types, vec![WaterType::Sea, WaterType::Lake]);
        assert_eq!(filter.min_kiteability, Some(40.0));
        assert!(!filter.tide_independent);
    }

    #[test]
    fn test_kiteable_only_for_literal_true() {
        for raw in ["1", "yes", "TRUE", ""] {
            let query = SpotQuery {
                kiteable: Some(raw.into()),
                ..SpotQuery::default()
            };
            assert!(!query.into_filter().unwrap().only_kiteable, "{raw}");
        }
    }

    #[test]
    fn test_bad_tokens_rejected() {
        let query = SpotQuery {
            directions: Some("SW,up".into()),
            ..SpotQuery::default()
        };
        assert!(matches!(query.into_filter(), Err(ApiError::BadRequest(_))));

        let query = SpotQuery {
            min_kiteability: Some("lots".into()),
            ..SpotQuery::default()
        };
        assert!(matches!(query.into_filter(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_pairing_ignores_list_order() {
        let spots = vec![test_spot("a", 52.0, 4.0), test_spot("b", 53.0, 5.0)];
        let observations = vec![
            Observation::new("b", snapshot(5.0, 225.0, 5.0)),
            Observation::new("a", snapshot(21.0, 225.0, 21.0)),
        ];
        let assessments = pair_by_id(&spots, observations).unwrap();
        assert_eq!(assessments[0].spot.id, "a");
        assert_eq!(assessments[0].weather.wind_speed(), 21.0);
        assert_eq!(assessments[1].weather.wind_speed(), 5.0);
    }

    #[test]
    fn test_pairing_missing_observation_is_internal() {
        let spots = vec![test_spot("a", 52.0, 4.0)];
        let result = pair_by_id(&spots, Vec::new());
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[test]
    fn test_preference_defaults() {
        let prefs = RiderPreferences::from(PreferencesInput::default());
        assert_eq!(prefs.weight, 75.0);
        assert_eq!(prefs.skill_level, SkillLevel::Intermediate);
        assert_eq!(prefs.discipline, Discipline::Freeride);
        assert!(prefs.kite_range.is_none());
    }

    #[test]
    fn test_non_positive_weight_uses_default() {
        for weight in [0.0, -10.0] {
            let prefs = RiderPreferences::from(PreferencesInput {
                weight: Some(weight),
                ..PreferencesInput::default()
            });
            assert_eq!(prefs.weight, DEFAULT_WEIGHT);
            // Same size as a 75 kg intermediate at 12 kn, not the 4 m² floor.
            assert_eq!(recommend(12.0, 12.0, &prefs).recommended_size, 15.0);
        }

        let prefs = RiderPreferences::from(PreferencesInput {
            weight: Some(62.0),
            ..PreferencesInput::default()
        });
        assert_eq!(prefs.weight, 62.0);
    }
}
