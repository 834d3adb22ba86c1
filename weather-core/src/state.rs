//! Display state of the search screen as an explicit transition function.

use serde::Serialize;

use crate::{
    error::{EMPTY_CITY_MESSAGE, WeatherError},
    model::{CurrentWeather, DailyForecast, WeatherReport},
};

/// Sequence number tagging one submitted search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId(u64);

#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayState {
    pub input: String,
    pub current: Option<CurrentWeather>,
    pub forecast: Vec<DailyForecast>,
    pub loading: bool,
    pub error: Option<String>,
    /// Index into `forecast` of the day shown in the detail view.
    pub selected_day: Option<usize>,
    #[serde(skip)]
    pending: Option<RequestId>,
    #[serde(skip)]
    next_request: u64,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&DailyForecast> {
        self.selected_day.and_then(|i| self.forecast.get(i))
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn has_result(&self) -> bool {
        self.current.is_some()
    }
}

#[derive(Debug)]
pub enum Event {
    InputChanged(String),
    Submitted,
    Loaded {
        request: RequestId,
        result: Result<WeatherReport, WeatherError>,
    },
    SelectDay(usize),
    CloseDetail,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch { request: RequestId, city: String },
}

/// Apply `event` to `state`.
///
/// A new submission supersedes any search still in flight: a later
/// `Loaded` carrying an older request id is ignored.
pub fn reduce(mut state: DisplayState, event: Event) -> (DisplayState, Option<Command>) {
    match event {
        Event::InputChanged(text) => {
            state.input = text;
            (state, None)
        }
        Event::Submitted => {
            let city = state.input.trim().to_string();
            if city.is_empty() {
                state.error = Some(EMPTY_CITY_MESSAGE.to_string());
                return (state, None);
            }

            state.next_request += 1;
            let request = RequestId(state.next_request);

            state.pending = Some(request);
            state.loading = true;
            state.error = None;
            state.current = None;
            state.forecast.clear();
            state.selected_day = None;

            (state, Some(Command::Fetch { request, city }))
        }
        Event::Loaded { request, result } => {
            if state.pending != Some(request) {
                tracing::debug!(?request, pending = ?state.pending, "dropping stale response");
                return (state, None);
            }

            state.pending = None;
            state.loading = false;
            match result {
                Ok(report) => {
                    state.current = Some(report.current);
                    state.forecast = report.forecast;
                    state.error = None;
                }
                Err(e) => {
                    state.current = None;
                    state.forecast.clear();
                    state.error = Some(e.user_message());
                }
            }
            (state, None)
        }
        Event::SelectDay(index) => {
            if index < state.forecast.len() {
                state.selected_day = Some(index);
            }
            (state, None)
        }
        Event::CloseDetail => {
            state.selected_day = None;
            (state, None)
        }
    }
}
