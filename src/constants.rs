/// User agent string for HTTP requests
pub const USER_AGENT: &str = concat!("weather-gateway/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo geocoding API base URL
pub const GEO_API_BASE: &str = "https://geocoding-api.open-meteo.com/v1";

/// Open-Meteo forecast API base URL
pub const WEATHER_API_BASE: &str = "https://api.open-meteo.com/v1";

/// Per-call upstream timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 1500;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

pub const DEFAULT_HTTP_PORT: u16 = 3001;

/// Number of days requested from the forecast endpoint and produced by the mock provider
pub const FORECAST_DAYS: usize = 5;

/// Daily variables requested from the forecast endpoint
pub const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

pub const NOTE_CITY_NOT_FOUND: &str = "city not found / no real data available";
pub const NOTE_UPSTREAM_UNAVAILABLE: &str = "upstream unavailable after retries";
pub const NOTE_GEOCODER_UNAVAILABLE: &str = "geocoding service unavailable / no real data available";
