use std::fmt::Display;

use crate::conditions::condition_label;
use crate::models::{CityForecast, CurrentWeather, ResolvedResult};

const NOT_AVAILABLE: &str = "N/A";

/// Formats current weather into a human-readable string
pub fn format_current(result: &ResolvedResult<CurrentWeather>) -> String {
    let current = result.data();
    let mut output = format!(
        "Current Weather for {} (source: {})\n",
        current.city,
        result.source().as_str()
    );

    output.push_str(&format!(
        "  Temperature: {}\n  Wind Speed: {}\n  Wind Direction: {}\n  Conditions: {}\n  Observed: {}\n",
        with_unit(current.temperature_c, "\u{00b0}C"),
        with_unit(current.wind_speed_kmh, " km/h"),
        with_unit(current.wind_direction_deg, "\u{00b0}"),
        condition_label(current.condition_code),
        or_na(current.observed_at.map(|t| t.format("%Y-%m-%d %H:%M"))),
    ));

    push_note(&mut output, result);
    output
}

/// Formats a daily forecast into a human-readable string
pub fn format_forecast(report: &CityForecast) -> String {
    let result = &report.forecast;
    let days = result.data();
    let mut output = format!(
        "{}-Day Forecast for {} (source: {})\n",
        days.len(),
        report.city,
        result.source().as_str()
    );

    if days.is_empty() {
        output.push_str("  No forecast data available\n");
    }

    for day in days {
        output.push_str(&format!(
            "\n{}:\n  Temperature: {:.1}\u{00b0}C - {:.1}\u{00b0}C\n  Conditions: {}\n",
            day.date,
            day.min_temp_c,
            day.max_temp_c,
            condition_label(day.condition_code),
        ));
    }

    push_note(&mut output, result);
    output
}

fn push_note<T>(output: &mut String, result: &ResolvedResult<T>) {
    if let Some(note) = result.note() {
        output.push_str(&format!("\nNote: {} (mock data, not real)\n", note));
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
