use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_HTTP_PORT, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_MS,
    GEO_API_BASE, WEATHER_API_BASE,
};

/// Retry settings for upstream fetches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after attempt `n` is `base_delay_ms * n`
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
        }
    }

    /// Delay to wait after the given failed attempt (1-based), linear backoff
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Service configuration, built once at startup and handed to the
/// components that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Geocoding API base URL (default: <https://geocoding-api.open-meteo.com/v1>)
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,

    /// Forecast API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Per-call upstream timeout in milliseconds (default: 1500)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub retry: RetryPolicy,

    /// HTTP transport port (default: 3001)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Append-only event log; no file log when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_geo_base_url() -> String {
    GEO_API_BASE.to_string()
}

fn default_weather_base_url() -> String {
    WEATHER_API_BASE.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

const fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

const fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}

const fn default_port() -> u16 {
    DEFAULT_HTTP_PORT
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geo_base_url: default_geo_base_url(),
            weather_base_url: default_weather_base_url(),
            timeout_ms: default_timeout_ms(),
            retry: RetryPolicy::default(),
            port: default_port(),
            log_file: None,
        }
    }
}

impl WeatherConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are ignored and values that fail to parse fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            geo_base_url: get("GEO_API_BASE")
                .map(|v| normalize_base_url(&v))
                .unwrap_or(defaults.geo_base_url),
            weather_base_url: get("WEATHER_API_BASE")
                .map(|v| normalize_base_url(&v))
                .unwrap_or(defaults.weather_base_url),
            timeout_ms: parse_or("API_TIMEOUT_MS", get("API_TIMEOUT_MS"), defaults.timeout_ms),
            retry: RetryPolicy {
                max_attempts: parse_or(
                    "WEATHER_RETRY_ATTEMPTS",
                    get("WEATHER_RETRY_ATTEMPTS"),
                    defaults.retry.max_attempts,
                ),
                base_delay_ms: parse_or(
                    "WEATHER_RETRY_DELAY_MS",
                    get("WEATHER_RETRY_DELAY_MS"),
                    defaults.retry.base_delay_ms,
                ),
            },
            port: parse_or("PORT", get("PORT"), defaults.port),
            log_file: get("WEATHER_LOG_FILE").map(PathBuf::from),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value {:?} for {}", raw, key);
            default
        }),
        None => default,
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
