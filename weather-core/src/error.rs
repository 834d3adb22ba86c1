use thiserror::Error;

pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Try again later.";

/// Errors surfaced to the user by a fetch cycle.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Input rejected before any network call.
    #[error("{}", EMPTY_CITY_MESSAGE)]
    Validation,

    /// The geocoding lookup returned no match.
    #[error("{city} not found")]
    NotFound { city: String },

    /// Any failure of the geocoding, current-weather or forecast request.
    /// The cause keeps its full `anyhow` context chain as the source.
    #[error("{}", FETCH_FAILED_MESSAGE)]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    pub fn fetch(cause: anyhow::Error) -> Self {
        Self::Fetch(cause.into())
    }

    /// Single line suitable for the error banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
