//! One search cycle: validate, optionally geocode, fetch both datasets
//! concurrently, aggregate.

use crate::{
    aggregate::aggregate,
    config::LookupMode,
    error::WeatherError,
    model::{Query, WeatherReport},
    provider::WeatherProvider,
};

/// Fetch current weather and the daily forecast for `city`.
///
/// The current-weather and forecast requests are issued together and both
/// are awaited before either result is looked at. Failure of any request
/// yields [`WeatherError::Fetch`]; nothing from a half-successful cycle is
/// returned.
pub async fn fetch_weather(
    provider: &dyn WeatherProvider,
    mode: LookupMode,
    city: &str,
) -> Result<WeatherReport, WeatherError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::Validation);
    }

    let query = match mode {
        LookupMode::Geocode => {
            let hits = provider.geocode(city).await.map_err(|e| {
                tracing::warn!(city, error = %format!("{e:#}"), "geocoding failed");
                WeatherError::fetch(e)
            })?;

            let Some(hit) = hits.into_iter().next() else {
                tracing::info!(city, "no geocoding match");
                return Err(WeatherError::NotFound {
                    city: city.to_string(),
                });
            };

            tracing::info!(
                city,
                lat = hit.lat,
                lon = hit.lon,
                resolved = %hit.name,
                "resolved city"
            );
            Query::Coords {
                lat: hit.lat,
                lon: hit.lon,
            }
        }
        LookupMode::Direct => Query::City(city.to_string()),
    };

    let (current, forecast) = tokio::join!(provider.current(&query), provider.forecast(&query));

    let (current, entries) = match (current, forecast) {
        (Ok(current), Ok(entries)) => (current, entries),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(city, error = %format!("{e:#}"), "weather fetch failed");
            return Err(WeatherError::fetch(e));
        }
    };

    let forecast = aggregate(&entries);
    tracing::info!(
        city,
        entries = entries.len(),
        days = forecast.len(),
        "weather fetched"
    );

    Ok(WeatherReport { current, forecast })
}
