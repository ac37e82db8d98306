//! Conversion of Open-Meteo payloads into the canonical weather shapes.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::models::{CurrentWeather, ForecastDay, RawCurrentPayload, RawForecastPayload};

const TEMPERATURE_KEYS: &[&str] = &["temperature", "temp"];
const WIND_SPEED_KEYS: &[&str] = &["windspeed", "windSpeed", "wind_speed"];
const WIND_DIRECTION_KEYS: &[&str] = &["winddirection", "windDirection", "wind_direction"];
const WEATHER_CODE_KEYS: &[&str] = &["weathercode", "weather_code"];

/// Normalizes a current-weather payload.
///
/// Reads the nested `current_weather` object when present, otherwise the
/// payload itself. `fallback_city` is used when the payload names no city.
pub fn normalize_current(payload: &RawCurrentPayload, fallback_city: &str) -> CurrentWeather {
    let root = &payload.0;
    let record = root.get("current_weather").unwrap_or(root);

    let city = [root, record]
        .iter()
        .find_map(|v| v.get("city").and_then(Value::as_str))
        .unwrap_or(fallback_city)
        .to_string();

    CurrentWeather {
        city,
        temperature_c: first_f64(record, TEMPERATURE_KEYS),
        wind_speed_kmh: first_f64(record, WIND_SPEED_KEYS),
        wind_direction_deg: first_f64(record, WIND_DIRECTION_KEYS),
        condition_code: first_i32(record, WEATHER_CODE_KEYS),
        observed_at: record
            .get("time")
            .and_then(Value::as_str)
            .and_then(parse_local_time),
    }
}

/// Zips the column-oriented `daily` arrays into one record per day.
///
/// The result is as long as the shortest of the date, max and min arrays
/// (and the code array, when the payload has one). Rows with an unreadable
/// date or temperature are dropped.
pub fn normalize_forecast(payload: &RawForecastPayload) -> Vec<ForecastDay> {
    let root = &payload.0;
    let daily = root.get("daily").unwrap_or(root);

    let dates = column(daily, &["time"]).unwrap_or(&[]);
    let maxs = column(daily, &["temperature_2m_max"]).unwrap_or(&[]);
    let mins = column(daily, &["temperature_2m_min"]).unwrap_or(&[]);
    let codes = column(daily, WEATHER_CODE_KEYS);

    let mut len = dates.len().min(maxs.len()).min(mins.len());
    if let Some(codes) = codes {
        len = len.min(codes.len());
    }

    (0..len)
        .filter_map(|i| {
            let date = dates[i]
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
            let (Some(date), Some(max_temp_c), Some(min_temp_c)) =
                (date, maxs[i].as_f64(), mins[i].as_f64())
            else {
                tracing::debug!("Skipping unreadable forecast row {}", i);
                return None;
            };
            let condition_code = codes.and_then(|codes| as_code(&codes[i]));

            Some(ForecastDay {
                date,
                min_temp_c,
                max_temp_c,
                condition_code,
            })
        })
        .collect()
}

fn first_f64(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|k| record.get(*k).and_then(Value::as_f64))
        .filter(|v| v.is_finite())
}

fn first_i32(record: &Value, keys: &[&str]) -> Option<i32> {
    keys.iter()
        .find_map(|k| record.get(*k).and_then(as_code))
}

/// Weather codes sometimes arrive as floats (`3.0`)
fn as_code(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .and_then(|c| i32::try_from(c).ok())
}

fn column<'a>(daily: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    keys.iter()
        .find_map(|k| daily.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice)
}

/// Open-Meteo reports local times without an offset, e.g. `2024-01-15T12:00`
fn parse_local_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
