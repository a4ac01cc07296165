use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use kitecast::{
    AppState, KitecastConfig, OpenMeteoProvider, SpotCatalog, WeatherCache, WeatherService,
    logging, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = KitecastConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging)?;

    info!("Kitecast v{} starting", kitecast::VERSION);

    let catalog = SpotCatalog::load(config.spots.catalog_path.as_deref())
        .context("Failed to load spot catalog")?;
    info!(
        spots = catalog.len(),
        regions = catalog.regions().len(),
        "Spot catalog loaded"
    );

    let provider = OpenMeteoProvider::new(&config.weather)
        .context("Failed to create weather provider")?;
    let cache = WeatherCache::new(config.cache.ttl());
    let weather = WeatherService::new(Arc::new(provider), cache);

    web::run(&config.server, AppState::new(catalog, weather)).await
}
