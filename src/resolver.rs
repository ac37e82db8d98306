//! City name in, weather with provenance out.
//!
//! The flow per request is: sanitize, geocode, fetch with retries, normalize.
//! Once the city name is valid the resolver always answers; any upstream
//! problem turns into mock data carrying a note that says why.

use std::sync::Arc;

use crate::config::{RetryPolicy, WeatherConfig};
use crate::constants::{NOTE_CITY_NOT_FOUND, NOTE_GEOCODER_UNAVAILABLE, NOTE_UPSTREAM_UNAVAILABLE};
use crate::error::WeatherError;
use crate::events::{EventSink, ResolutionEvent};
use crate::mock::MockDataProvider;
use crate::models::{CityForecast, Coordinates, CurrentWeather, ForecastDay, ResolvedResult};
use crate::normalize::{normalize_current, normalize_forecast};
use crate::retry::with_retry;
use crate::sanitize::sanitize_city;
use crate::upstream::{OpenMeteoUpstream, WeatherUpstream};

const COMPONENT: &str = "resolver";

#[derive(Clone)]
pub struct WeatherResolver {
    upstream: Arc<dyn WeatherUpstream>,
    mock: MockDataProvider,
    retry: RetryPolicy,
    events: Arc<dyn EventSink>,
}

impl WeatherResolver {
    pub fn new(
        upstream: Arc<dyn WeatherUpstream>,
        retry: RetryPolicy,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            upstream,
            mock: MockDataProvider::new(),
            retry,
            events,
        }
    }

    /// Builds a resolver backed by Open-Meteo
    pub fn from_config(
        config: &WeatherConfig,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, WeatherError> {
        let upstream = OpenMeteoUpstream::new(config)?;
        Ok(Self::new(Arc::new(upstream), config.retry.clone(), events))
    }

    pub async fn resolve_current(
        &self,
        raw_city: &str,
    ) -> Result<ResolvedResult<CurrentWeather>, WeatherError> {
        let city = self.sanitize(raw_city)?;

        let coords = match self.locate(&city).await {
            Ok(coords) => coords,
            Err(note) => return Ok(ResolvedResult::mock(self.mock.mock_current(&city), note)),
        };

        match with_retry(&self.retry, || self.upstream.fetch_current(coords)).await {
            Ok(payload) => {
                self.record(ResolutionEvent::info(
                    COMPONENT,
                    format!("Current weather for '{city}' from upstream"),
                ));
                Ok(ResolvedResult::upstream(normalize_current(&payload, &city)))
            }
            Err(e) => {
                self.record(ResolutionEvent::error(
                    COMPONENT,
                    format!("Current weather for '{city}' failed after retries ({e}), using mock data"),
                ));
                Ok(ResolvedResult::mock(
                    self.mock.mock_current(&city),
                    NOTE_UPSTREAM_UNAVAILABLE,
                ))
            }
        }
    }

    /// Resolves a 5-day forecast; the returned city is the sanitized name
    /// that was geocoded.
    pub async fn resolve_forecast(&self, raw_city: &str) -> Result<CityForecast, WeatherError> {
        let city = self.sanitize(raw_city)?;

        let forecast = match self.locate(&city).await {
            Ok(coords) => self.fetch_forecast(&city, coords).await,
            Err(note) => ResolvedResult::mock(self.mock.mock_forecast(&city), note),
        };

        Ok(CityForecast { city, forecast })
    }

    async fn fetch_forecast(
        &self,
        city: &str,
        coords: Coordinates,
    ) -> ResolvedResult<Vec<ForecastDay>> {
        match with_retry(&self.retry, || self.upstream.fetch_forecast(coords)).await {
            Ok(payload) => {
                let days = normalize_forecast(&payload);
                self.record(ResolutionEvent::info(
                    COMPONENT,
                    format!("Forecast for '{city}' from upstream ({} days)", days.len()),
                ));
                ResolvedResult::upstream(days)
            }
            Err(e) => {
                self.record(ResolutionEvent::error(
                    COMPONENT,
                    format!("Forecast for '{city}' failed after retries ({e}), using mock data"),
                ));
                ResolvedResult::mock(self.mock.mock_forecast(city), NOTE_UPSTREAM_UNAVAILABLE)
            }
        }
    }

    fn sanitize(&self, raw_city: &str) -> Result<String, WeatherError> {
        let city = sanitize_city(raw_city).inspect_err(|e| {
            self.record(ResolutionEvent::warn(
                COMPONENT,
                format!("Rejected city {raw_city:?}: {e}"),
            ));
        })?;
        tracing::debug!("Sanitized city raw={:?} sanitized={:?}", raw_city, city);
        Ok(city)
    }

    /// Geocodes once, without retrying: a miss is deterministic.
    /// `Err` carries the note for the mock fallback.
    async fn locate(&self, city: &str) -> Result<Coordinates, &'static str> {
        match self.upstream.resolve_coordinates(city).await {
            Ok(Some(coords)) => Ok(coords),
            Ok(None) => {
                self.record(ResolutionEvent::info(
                    COMPONENT,
                    format!("Geocode miss for '{city}', using mock data"),
                ));
                Err(NOTE_CITY_NOT_FOUND)
            }
            Err(e) => {
                self.record(ResolutionEvent::error(
                    COMPONENT,
                    format!("Geocoding '{city}' failed ({e}), using mock data"),
                ));
                Err(NOTE_GEOCODER_UNAVAILABLE)
            }
        }
    }

    fn record(&self, event: ResolutionEvent) {
        self.events.record(event);
    }
}
