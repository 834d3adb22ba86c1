use crate::{
    config::Config,
    error::WeatherError,
    model::{Coordinates, CurrentWeather, ForecastEntry, Query},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Remote source of geocoding, current weather and 3-hour forecast data.
///
/// Implementations report failures as `anyhow` errors carrying context; the
/// fetch orchestrator decides how they reach the user.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a place name. An empty vector means "no such place".
    async fn geocode(&self, city: &str) -> anyhow::Result<Vec<Coordinates>>;

    async fn current(&self, query: &Query) -> anyhow::Result<CurrentWeather>;

    /// Raw 3-hour entries in the order the API returned them.
    async fn forecast(&self, query: &Query) -> anyhow::Result<Vec<ForecastEntry>>;
}

/// Construct the OpenWeather provider from config (file + environment).
pub fn provider_from_config(config: &Config) -> Result<OpenWeatherProvider, WeatherError> {
    let client_config = config.client_config()?;
    OpenWeatherProvider::new(client_config)
        .map_err(|e| WeatherError::Config(format!("Failed to build HTTP client: {e:#}")))
}
