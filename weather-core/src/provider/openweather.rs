use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::ClientConfig,
    model::{Condition, Coordinates, CurrentWeather, ForecastEntry, Query},
};

use super::WeatherProvider;

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Temperatures in Celsius, wind speed in m/s.
const UNITS: &str = "metric";
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: ClientConfig,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self { config, http })
    }

    /// GET `path` with the API key and units appended, decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(endpoint = path, "OpenWeather {what} request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[
                ("appid", self.config.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

fn query_params(query: &Query) -> Vec<(&'static str, String)> {
    match query {
        Query::City(name) => vec![("q", name.clone())],
        Query::Coords { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoHit {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: String,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    id: u16,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

fn condition_of(weather: Vec<OwWeather>) -> Condition {
    weather
        .into_iter()
        .next()
        .map(|w| Condition {
            code: w.id,
            description: if w.description.is_empty() {
                "Unknown".to_string()
            } else {
                w.description
            },
            icon: w.icon,
        })
        .unwrap_or_else(Condition::unknown)
}

impl From<OwGeoHit> for Coordinates {
    fn from(hit: OwGeoHit) -> Self {
        Coordinates {
            lat: hit.lat,
            lon: hit.lon,
            name: hit.name,
            country: hit.country,
        }
    }
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let observation_time = parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);

        CurrentWeather {
            location_name: parsed.name,
            country: parsed.sys.country,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like.unwrap_or(parsed.main.temp),
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            visibility_m: parsed.visibility,
            condition: condition_of(parsed.weather),
            observation_time,
        }
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = anyhow::Error;

    fn try_from(entry: OwForecastEntry) -> Result<Self> {
        let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
            .with_context(|| format!("Invalid forecast timestamp '{}'", entry.dt_txt))?;

        Ok(ForecastEntry {
            timestamp,
            temperature_c: entry.main.temp,
            humidity_pct: entry.main.humidity,
            wind_speed_mps: entry.wind.speed,
            condition: condition_of(entry.weather),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, city: &str) -> Result<Vec<Coordinates>> {
        let params = [("q", city.to_string()), ("limit", "1".to_string())];
        let hits: Vec<OwGeoHit> = self.get_json(GEOCODE_PATH, &params, "geocoding").await?;

        Ok(hits.into_iter().map(Coordinates::from).collect())
    }

    async fn current(&self, query: &Query) -> Result<CurrentWeather> {
        let parsed: OwCurrentResponse = self
            .get_json(CURRENT_PATH, &query_params(query), "current weather")
            .await?;

        Ok(parsed.into())
    }

    async fn forecast(&self, query: &Query) -> Result<Vec<ForecastEntry>> {
        let parsed: OwForecastResponse = self
            .get_json(FORECAST_PATH, &query_params(query), "5-day forecast")
            .await?;

        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
