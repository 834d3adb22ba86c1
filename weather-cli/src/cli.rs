use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use weather_core::{
    Command as StateCommand, Config, DisplayState, Event, Layout, LookupMode, WeatherProvider,
    fetch_weather, provider_from_config, reduce,
};

use crate::render::{day_label, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key and display preferences.
    Configure,

    /// Show current weather and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Result layout; defaults to the configured one.
        #[arg(long, value_parser = parse_layout)]
        layout: Option<Layout>,

        /// How the city is resolved; defaults to the configured one.
        #[arg(long, value_parser = parse_mode)]
        mode: Option<LookupMode>,

        /// Also show the 3-hour details of forecast day N (1-based).
        #[arg(long)]
        day: Option<usize>,

        /// Print the result as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive search: enter cities and pick days to inspect.
    Search {
        #[arg(long, value_parser = parse_layout)]
        layout: Option<Layout>,

        #[arg(long, value_parser = parse_mode)]
        mode: Option<LookupMode>,
    },
}

fn parse_layout(s: &str) -> Result<Layout, String> {
    Layout::try_from(s).map_err(|e| e.to_string())
}

fn parse_mode(s: &str) -> Result<LookupMode, String> {
    LookupMode::try_from(s).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                layout,
                mode,
                day,
                json,
            } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let layout = layout.unwrap_or(config.layout);
                let mode = mode.unwrap_or(config.lookup_mode);

                let (state, _) = reduce(DisplayState::new(), Event::InputChanged(city));
                let mut state = submit(&provider, mode, state, |_| {}).await;

                if let Some(err) = &state.error {
                    bail!("{err}");
                }

                if let Some(n) = day {
                    if n == 0 || n > state.forecast.len() {
                        bail!("Day {n} is out of range (1..={})", state.forecast.len());
                    }
                    state = reduce(state, Event::SelectDay(n - 1)).0;
                }

                if json {
                    println!("{}", serde_json::to_string_pretty(&state)?);
                } else {
                    print!("{}", render(&state, layout));
                }
                Ok(())
            }
            Command::Search { layout, mode } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                search(
                    &provider,
                    layout.unwrap_or(config.layout),
                    mode.unwrap_or(config.lookup_mode),
                )
                .await
            }
        }
    }
}

/// Submit the current input and, if a fetch was requested, apply its result.
///
/// `before_fetch` sees the loading state while the request is in flight.
async fn submit<F>(
    provider: &dyn WeatherProvider,
    mode: LookupMode,
    state: DisplayState,
    before_fetch: F,
) -> DisplayState
where
    F: FnOnce(&DisplayState),
{
    let (state, command) = reduce(state, Event::Submitted);

    match command {
        Some(StateCommand::Fetch { request, city }) => {
            before_fetch(&state);
            let result = fetch_weather(provider, mode, &city).await;
            reduce(state, Event::Loaded { request, result }).0
        }
        None => state,
    }
}

async fn search(
    provider: &dyn WeatherProvider,
    layout: Layout,
    mode: LookupMode,
) -> anyhow::Result<()> {
    let mut state = DisplayState::new();

    loop {
        let city = match prompt_or_quit(
            Text::new("City:")
                .with_placeholder("Enter city name...")
                .with_help_message("Esc to quit")
                .prompt(),
        )? {
            Some(city) => city,
            None => return Ok(()),
        };

        state = reduce(state, Event::InputChanged(city)).0;
        state = submit(provider, mode, state, |s| print!("{}", render(s, layout))).await;
        print!("{}", render(&state, layout));

        if state.has_result() && !pick_days(&mut state, layout)? {
            return Ok(());
        }
    }
}

const NEW_SEARCH: &str = "New search";

/// Day-detail loop. Returns `false` when the user wants to quit.
fn pick_days(state: &mut DisplayState, layout: Layout) -> anyhow::Result<bool> {
    loop {
        let mut options: Vec<String> = state.forecast.iter().map(day_label).collect();
        options.push(NEW_SEARCH.to_string());

        let choice = match prompt_or_quit(Select::new("Show details for:", options).raw_prompt())? {
            Some(choice) => choice,
            None => return Ok(false),
        };

        if choice.index >= state.forecast.len() {
            *state = reduce(std::mem::take(state), Event::CloseDetail).0;
            return Ok(true);
        }

        *state = reduce(std::mem::take(state), Event::SelectDay(choice.index)).0;
        print!("{}", render(state, layout));
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }

    config.lookup_mode = select_current("City lookup:", LookupMode::all(), config.lookup_mode)?;
    config.layout = select_current("Layout:", Layout::all(), config.layout)?;

    if !config.is_configured() {
        tracing::warn!("no API key stored; set OPENWEATHER_API_KEY or re-run configure");
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn select_current<T>(message: &str, all: &[T], current: T) -> anyhow::Result<T>
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let start = all.iter().position(|v| *v == current).unwrap_or(0);
    Select::new(message, all.to_vec())
        .with_starting_cursor(start)
        .prompt()
        .with_context(|| format!("Failed to read choice for '{message}'"))
}

/// Map Esc / Ctrl-C to `None`, keep other prompt errors.
fn prompt_or_quit<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Prompt failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_layout_mode_and_day() {
        let cli = Cli::try_parse_from([
            "weather", "show", "Paris", "--layout", "compact", "--mode", "direct", "--day", "2",
        ])
        .unwrap();

        match cli.command {
            Command::Show {
                city,
                layout,
                mode,
                day,
                json,
            } => {
                assert_eq!(city, "Paris");
                assert_eq!(layout, Some(Layout::Compact));
                assert_eq!(mode, Some(LookupMode::Direct));
                assert_eq!(day, Some(2));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let err =
            Cli::try_parse_from(["weather", "show", "Paris", "--layout", "grid"]).unwrap_err();
        assert!(err.to_string().contains("Unknown layout"));
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["weather", "search", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Search {
                layout: None,
                mode: None
            }
        ));
    }
}
