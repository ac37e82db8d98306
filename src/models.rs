use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Canonical Weather Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub city: String,
    pub temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub condition_code: Option<i32>,
    pub observed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub condition_code: Option<i32>,
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Upstream,
    Mock,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Upstream => "upstream",
            Source::Mock => "mock",
        }
    }
}

/// A weather value tagged with its provenance.
///
/// A mock-sourced result always carries a note, an upstream one never does.
/// The fields are private so that only [`ResolvedResult::upstream`] and
/// [`ResolvedResult::mock`] can build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResult<T> {
    source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    data: T,
}

impl<T> ResolvedResult<T> {
    pub fn upstream(data: T) -> Self {
        Self {
            source: Source::Upstream,
            note: None,
            data,
        }
    }

    pub fn mock(data: T, note: impl Into<String>) -> Self {
        Self {
            source: Source::Mock,
            note: Some(note.into()),
            data,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn is_mock(&self) -> bool {
        self.source == Source::Mock
    }
}

/// A forecast together with the sanitized city it was resolved for
#[derive(Debug, Clone, PartialEq)]
pub struct CityForecast {
    pub city: String,
    pub forecast: ResolvedResult<Vec<ForecastDay>>,
}

// ============================================================================
// Open-Meteo API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub latitude: f64,
    pub longitude: f64,
}

/// Body of a `current_weather=true` forecast call, kept loosely typed because
/// the field names vary between providers and fixtures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawCurrentPayload(pub serde_json::Value);

/// Body of a `daily=...` forecast call (column-oriented arrays).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawForecastPayload(pub serde_json::Value);

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct CityRequest {
    /// City name, e.g. "Berlin" or "in Tokyo"
    pub city: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct LogsRequest {
    /// Only return the last N lines
    pub max_lines: Option<usize>,
}
