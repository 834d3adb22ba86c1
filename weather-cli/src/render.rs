//! Text rendering of the display state.
//!
//! Both layouts show the same panels: current conditions, the daily list and
//! the detail of the selected day. Rounding happens here only.

use std::fmt::Write as _;

use chrono::NaiveDate;
use weather_core::{CurrentWeather, DailyForecast, DisplayState, ForecastEntry, Layout};

pub fn render(state: &DisplayState, layout: Layout) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str("Loading...\n");
    }
    if let Some(err) = &state.error {
        let _ = writeln!(out, "{err}");
    }

    match layout {
        Layout::Card => render_card(&mut out, state),
        Layout::Compact => render_compact(&mut out, state),
    }

    out
}

/// Label used by the interactive day picker.
pub fn day_label(day: &DailyForecast) -> String {
    format!(
        "{}  Min: {}°C | Max: {}°C",
        format_date(day.date()),
        one_decimal(day.min_c()),
        one_decimal(day.max_c())
    )
}

fn render_card(out: &mut String, state: &DisplayState) {
    if let Some(current) = &state.current {
        card_current(out, current);
    }

    if !state.forecast.is_empty() {
        out.push_str("\n5-Day Forecast\n");
        for (i, day) in state.forecast.iter().enumerate() {
            let _ = writeln!(out, "  [{}] {}", i + 1, day_label(day));
        }
    }

    if let Some(day) = state.selected() {
        let _ = writeln!(out, "\nDetails for {}", format_date(day.date()));
        for entry in day.entries() {
            card_entry(out, entry);
        }
    }
}

fn card_current(out: &mut String, current: &CurrentWeather) {
    let _ = writeln!(out, "{}", current.display_name());
    let _ = writeln!(
        out,
        "  Temperature: {}°C (feels like {}°C)",
        one_decimal(current.temperature_c),
        one_decimal(current.feels_like_c)
    );
    let _ = writeln!(out, "  Condition: {}", capitalize(&current.condition.description));
    if let Some(url) = current.condition.icon_url() {
        let _ = writeln!(out, "  Icon: {url}");
    }
    let _ = writeln!(out, "  Wind Speed: {} m/s", one_decimal(current.wind_speed_mps));
    let _ = writeln!(out, "  Humidity: {}%", current.humidity_pct);
    if let Some(v) = current.visibility_m {
        let _ = writeln!(out, "  Visibility: {:.1} km", f64::from(v) / 1000.0);
    }
}

fn card_entry(out: &mut String, entry: &ForecastEntry) {
    let _ = writeln!(out, "  {}", entry.timestamp.format("%H:%M"));
    let _ = writeln!(out, "    Temp: {}°C", one_decimal(entry.temperature_c));
    let _ = writeln!(out, "    {}", capitalize(&entry.condition.description));
    let _ = writeln!(out, "    Wind: {} m/s", one_decimal(entry.wind_speed_mps));
    let _ = writeln!(out, "    Humidity: {}%", entry.humidity_pct);
}

fn render_compact(out: &mut String, state: &DisplayState) {
    if let Some(c) = &state.current {
        let _ = writeln!(
            out,
            "{} | {}°C (feels {}°C) | {} | wind {} m/s | hum {}%",
            c.display_name(),
            one_decimal(c.temperature_c),
            one_decimal(c.feels_like_c),
            c.condition.description,
            one_decimal(c.wind_speed_mps),
            c.humidity_pct
        );
    }

    for (i, day) in state.forecast.iter().enumerate() {
        let marker = if state.selected_day == Some(i) { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker}{} {}  {:>6} / {:<6} {}",
            i + 1,
            day.date().format("%a %d %b"),
            one_decimal(day.min_c()),
            one_decimal(day.max_c()),
            dominant_description(day)
        );
    }

    if let Some(day) = state.selected() {
        for e in day.entries() {
            let _ = writeln!(
                out,
                "    {}  {:>6}°C  {:<20} {} m/s  {}%",
                e.timestamp.format("%H:%M"),
                one_decimal(e.temperature_c),
                e.condition.description,
                one_decimal(e.wind_speed_mps),
                e.humidity_pct
            );
        }
    }
}

/// Description of the slot nearest midday.
fn dominant_description(day: &DailyForecast) -> &str {
    use chrono::Timelike;

    day.entries()
        .iter()
        .min_by_key(|e| (i64::from(e.timestamp.hour()) - 12).abs())
        .map(|e| e.condition.description.as_str())
        .unwrap_or("")
}

fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn capitalize(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
