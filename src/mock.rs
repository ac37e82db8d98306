//! Synthetic weather used when the real providers cannot answer.
//!
//! Values are deterministic so callers (and tests) see stable output; only the
//! dates follow the clock.

use chrono::{Days, Local, NaiveDate};

use crate::constants::FORECAST_DAYS;
use crate::models::{CurrentWeather, ForecastDay};

/// Sunny, partly cloudy, slight rain, overcast, mainly clear
const FORECAST_CONDITIONS: [i32; 5] = [0, 2, 61, 3, 1];

#[derive(Debug, Clone, Copy, Default)]
pub struct MockDataProvider;

impl MockDataProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn mock_current(&self, city: &str) -> CurrentWeather {
        CurrentWeather {
            city: city.to_string(),
            temperature_c: Some(18.3),
            wind_speed_kmh: Some(6.2),
            wind_direction_deg: Some(225.0),
            condition_code: Some(2),
            observed_at: Some(Local::now().naive_local()),
        }
    }

    /// Five consecutive days starting today
    pub fn mock_forecast(&self, _city: &str) -> Vec<ForecastDay> {
        self.mock_forecast_from(Local::now().date_naive())
    }

    pub fn mock_forecast_from(&self, start: NaiveDate) -> Vec<ForecastDay> {
        (0..FORECAST_DAYS)
            .filter_map(|i| {
                let date = start.checked_add_days(Days::new(i as u64))?;
                let offset = i as f64;
                Some(ForecastDay {
                    date,
                    min_temp_c: 15.0 + offset,
                    max_temp_c: 22.0 + offset,
                    condition_code: Some(FORECAST_CONDITIONS[i % FORECAST_CONDITIONS.len()]),
                })
            })
            .collect()
    }
}
