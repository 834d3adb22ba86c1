use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Weather condition as reported by OpenWeather (`weather[0]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// OpenWeather condition id, e.g. 800 for clear sky.
    pub code: u16,
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn unknown() -> Self {
        Self {
            code: 0,
            description: "Unknown".to_string(),
            icon: String::new(),
        }
    }

    /// Public URL of the condition icon, if the API sent an icon id.
    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            None
        } else {
            Some(format!("{ICON_BASE_URL}/{}@2x.png", self.icon))
        }
    }
}

/// Resolved geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub country: Option<String>,
}

/// How the current-weather and forecast endpoints are addressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coords { lat: f64, lon: f64 },
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: Condition,
}

/// All forecast entries for one calendar date.
///
/// `min_c`/`max_c` are derived from `entries` when the value is built and
/// cannot be set independently. A `DailyForecast` always holds at least one
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    date: NaiveDate,
    min_c: f64,
    max_c: f64,
    entries: Vec<ForecastEntry>,
}

impl DailyForecast {
    /// Build a day from its entries. Returns `None` when `entries` is empty.
    pub fn from_entries(date: NaiveDate, entries: Vec<ForecastEntry>) -> Option<Self> {
        let first = entries.first()?.temperature_c;
        let (min_c, max_c) = entries
            .iter()
            .map(|e| e.temperature_c)
            .fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));

        Some(Self {
            date,
            min_c,
            max_c,
            entries,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn min_c(&self) -> f64 {
        self.min_c
    }

    pub fn max_c(&self) -> f64 {
        self.max_c
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub visibility_m: Option<u32>,
    pub condition: Condition,
    pub observation_time: DateTime<Utc>,
}

impl CurrentWeather {
    /// "Name, CC" or just "Name" when the country is missing.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(c) if !c.is_empty() => format!("{}, {}", self.location_name, c),
            _ => self.location_name.clone(),
        }
    }
}

/// Result of one successful fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<DailyForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, temp: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            temperature_c: temp,
            humidity_pct: 50,
            wind_speed_mps: 1.0,
            condition: Condition::unknown(),
        }
    }

    #[test]
    fn daily_forecast_requires_entries() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(DailyForecast::from_entries(date, Vec::new()).is_none());
    }

    #[test]
    fn daily_forecast_derives_min_max() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let day = DailyForecast::from_entries(
            date,
            vec![
                entry("2024-05-01 00:00:00", 3.5),
                entry("2024-05-01 03:00:00", -1.25),
                entry("2024-05-01 06:00:00", 7.0),
            ],
        )
        .unwrap();

        assert_eq!(day.min_c(), -1.25);
        assert_eq!(day.max_c(), 7.0);
        assert_eq!(day.entries().len(), 3);
    }

    #[test]
    fn icon_url_uses_icon_id() {
        let c = Condition {
            code: 800,
            description: "clear sky".into(),
            icon: "01d".into(),
        };
        assert_eq!(
            c.icon_url().as_deref(),
            Some("https://openweathermap.org/img/wn/01d@2x.png")
        );
        assert!(Condition::unknown().icon_url().is_none());
    }
}
