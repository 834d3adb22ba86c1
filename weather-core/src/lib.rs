//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] abstraction
//! - The fetch cycle and the daily forecast aggregation
//! - Display state as an explicit transition function
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod state;

pub use aggregate::{MAX_FORECAST_DAYS, aggregate};
pub use config::{ClientConfig, Config, Layout, LookupMode};
pub use error::WeatherError;
pub use fetch::fetch_weather;
pub use model::{
    Condition, Coordinates, CurrentWeather, DailyForecast, ForecastEntry, Query, WeatherReport,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use state::{Command, DisplayState, Event, RequestId, reduce};
