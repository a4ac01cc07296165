//! Cache-through weather lookups for spots

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{Observation, ProviderError, SyntheticWeather, WeatherProvider, group_spots};
use crate::cache::WeatherCache;
use crate::kitesurf::spots::Spot;

/// Where an observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationSource {
    Cache,
    Live,
    /// The provider failed and synthetic weather was substituted.
    Synthetic,
}

pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cache: WeatherCache,
    fallback: SyntheticWeather,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, cache: WeatherCache) -> Self {
        Self {
            provider,
            cache,
            fallback: SyntheticWeather::new(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Current weather for a spot. Never fails: provider errors are logged
    /// and replaced with synthetic weather.
    pub async fn observation_for_spot(&self, spot: &Spot) -> Observation {
        self.resolve(spot).await.0
    }

    /// Like [`Self::observation_for_spot`], also reporting the source.
    ///
    /// Live results are cached under the spot id; synthetic ones are not, so
    /// the next lookup tries the provider again.
    #[instrument(name = "observation_for_spot", skip(self, spot), fields(spot = %spot.id))]
    pub async fn resolve(&self, spot: &Spot) -> (Observation, ObservationSource) {
        if let Some(cached) = self.cache.get(&spot.id) {
            debug!("Serving cached weather");
            return (cached, ObservationSource::Cache);
        }

        match self.fetch_live(spot).await {
            Ok(observation) => {
                self.cache.insert(&spot.id, observation.clone());
                (observation, ObservationSource::Live)
            }
            Err(e) => {
                warn!("Failed to fetch weather for {}: {e}; using synthetic data", spot.name);
                let snapshot = self.fallback.generate(&spot.coordinates, Utc::now());
                (Observation::new(&spot.id, snapshot), ObservationSource::Synthetic)
            }
        }
    }

    async fn fetch_live(&self, spot: &Spot) -> Result<Observation, ProviderError> {
        let snapshot = self.provider.fetch_current(&spot.coordinates).await?;
        info!(
            "Fetched live weather: {:.1} kn from {:.0}°",
            snapshot.wind_speed, snapshot.wind_direction
        );
        Ok(Observation::new(&spot.id, snapshot))
    }

    /// Weather for many spots with one lookup per 0.1° grid cell.
    ///
    /// The first spot of each cell is looked up (through the cache) and its
    /// observation is copied to the other spots of the cell with only the
    /// spot id changed. Cells are looked up concurrently. The result is in
    /// grid discovery order, not input order; match results by `spot_id`.
    pub async fn observations_for_spots(&self, spots: &[Spot]) -> Vec<Observation> {
        let groups = group_spots(spots);
        debug!("{} spots fall into {} grid cells", spots.len(), groups.len());

        let lookups = groups.iter().map(|(_, group)| async move {
            let representative = group[0];
            let observation = self.observation_for_spot(representative).await;
            group
                .iter()
                .map(|spot| observation.for_spot(&spot.id))
                .collect::<Vec<_>>()
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitesurf::spots::test_spot;
    use crate::weather::testing::{StubProvider, snapshot};
    use std::time::Duration;

    fn service(provider: Arc<StubProvider>) -> WeatherService {
        WeatherService::new(provider, WeatherCache::new(Duration::from_secs(600)))
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let provider = Arc::new(StubProvider::returning(snapshot(18.0, 315.0, 19.0)));
        let service = service(provider.clone());
        let spot = test_spot("scheveningen", 52.11, 4.28);

        let (first, source) = service.resolve(&spot).await;
        assert_eq!(source, ObservationSource::Live);
        assert_eq!(first.spot_id, "scheveningen");

        let (second, source) = service.resolve(&spot).await;
        assert_eq!(source, ObservationSource::Cache);
        assert_eq!(second, first);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_call_after_ttl_fetches_again() {
        let provider = Arc::new(StubProvider::returning(snapshot(18.0, 315.0, 19.0)));
        let ttl = Duration::from_millis(150);
        let service = WeatherService::new(provider.clone(), WeatherCache::new(ttl));
        let spot = test_spot("scheveningen", 52.11, 4.28);

        service.observation_for_spot(&spot).await;
        tokio::time::sleep(ttl * 3).await;
        let (_, source) = service.resolve(&spot).await;

        assert_eq!(source, ObservationSource::Live);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_without_caching() {
        let provider = Arc::new(StubProvider::failing());
        let service = service(provider.clone());
        let spot = test_spot("zandvoort", 52.37, 4.52);

        let (observation, source) = service.resolve(&spot).await;
        assert_eq!(source, ObservationSource::Synthetic);
        assert_eq!(observation.spot_id, "zandvoort");
        assert!((5.0..=30.0).contains(&observation.wind_speed()));
        assert!(service.cache().is_empty());

        let (_, source) = service.resolve(&spot).await;
        assert_eq!(source, ObservationSource::Synthetic);
        assert_eq!(provider.calls(), 2, "each lookup retries the provider");
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let provider = Arc::new(StubProvider::returning(snapshot(18.0, 315.0, 19.0)));
        let service = service(provider.clone());
        let spot = test_spot("kijkduin", 52.07, 4.217);

        service.observation_for_spot(&spot).await;
        service.cache().clear();
        service.observation_for_spot(&spot).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_grouped_spots_share_one_fetch() {
        let provider = Arc::new(StubProvider::returning(snapshot(18.0, 315.0, 19.0)));
        let service = service(provider.clone());
        let spots = vec![
            test_spot("wijk-aan-zee", 52.4930, 4.5900),
            test_spot("scheveningen", 52.1106, 4.2779),
            test_spot("ijmuiden", 52.4650, 4.5550),
        ];

        let observations = service.observations_for_spots(&spots).await;
        assert_eq!(provider.calls(), 2);

        let ids: Vec<&str> = observations.iter().map(|o| o.spot_id.as_str()).collect();
        assert_eq!(ids, vec!["wijk-aan-zee", "ijmuiden", "scheveningen"]);
        assert_eq!(observations[0].snapshot, observations[1].snapshot);

        // The representative of each cell is the one that was fetched.
        let seen = provider.seen.lock().unwrap();
        assert!(seen.iter().any(|c| c.lat == 52.4930));
        assert!(!seen.iter().any(|c| c.lat == 52.4650));
    }

    #[tokio::test]
    async fn test_only_representative_is_cached() {
        let provider = Arc::new(StubProvider::returning(snapshot(18.0, 315.0, 19.0)));
        let service = service(provider.clone());
        let spots = vec![
            test_spot("wijk-aan-zee", 52.4930, 4.5900),
            test_spot("ijmuiden", 52.4650, 4.5550),
        ];

        service.observations_for_spots(&spots).await;
        assert_eq!(service.cache().len(), 1);
        assert!(service.cache().get("wijk-aan-zee").is_some());
    }
}
