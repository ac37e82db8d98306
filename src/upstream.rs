//! HTTP access to the Open-Meteo geocoding and forecast APIs.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::WeatherConfig;
use crate::constants::{DAILY_FIELDS, FORECAST_DAYS, USER_AGENT};
use crate::error::WeatherError;
use crate::models::{Coordinates, GeocodingResponse, RawCurrentPayload, RawForecastPayload};

/// Upstream calls needed by the resolver
#[async_trait]
pub trait WeatherUpstream: Send + Sync {
    /// Looks up the best match for a city name.
    ///
    /// `Ok(None)` means the city is unknown, the lookup timed out, or the
    /// geocoder answered with a non-success status.
    async fn resolve_coordinates(&self, city: &str) -> Result<Option<Coordinates>, WeatherError>;

    async fn fetch_current(&self, coords: Coordinates) -> Result<RawCurrentPayload, WeatherError>;

    async fn fetch_forecast(&self, coords: Coordinates) -> Result<RawForecastPayload, WeatherError>;
}

/// Open-Meteo client; every call is bounded by the configured timeout
#[derive(Debug, Clone)]
pub struct OpenMeteoUpstream {
    client: Arc<Client>,
    geo_base_url: String,
    weather_base_url: String,
}

impl OpenMeteoUpstream {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| WeatherError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            geo_base_url: config.geo_base_url.clone(),
            weather_base_url: config.weather_base_url.clone(),
        })
    }

    /// Makes an HTTP GET request and deserializes the JSON response
    async fn make_request<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered with status {}", url, status);
            return Err(WeatherError::UpstreamHttpError {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.weather_base_url)
    }

    fn coordinate_params(coords: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
        ]
    }
}

#[async_trait]
impl WeatherUpstream for OpenMeteoUpstream {
    async fn resolve_coordinates(&self, city: &str) -> Result<Option<Coordinates>, WeatherError> {
        let url = format!("{}/search", self.geo_base_url);
        let query = [("name", city.to_string()), ("count", "1".to_string())];

        let response = match self.client.get(&url).query(&query).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::debug!("Geocoding for '{}' timed out", city);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Geocoding for '{}' failed with status {}", city, status);
            return Ok(None);
        }

        let body: GeocodingResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() || e.is_decode() => {
                tracing::debug!("Geocoding for '{}' returned no usable body: {}", city, e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let coords = body
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|r| Coordinates {
                latitude: r.latitude,
                longitude: r.longitude,
            });

        if coords.is_none() {
            tracing::debug!("No geocoding results for '{}'", city);
        }
        Ok(coords)
    }

    async fn fetch_current(&self, coords: Coordinates) -> Result<RawCurrentPayload, WeatherError> {
        let mut query = Self::coordinate_params(coords);
        query.push(("current_weather", "true".to_string()));

        self.make_request(&self.forecast_url(), &query).await
    }

    async fn fetch_forecast(&self, coords: Coordinates) -> Result<RawForecastPayload, WeatherError> {
        let mut query = Self::coordinate_params(coords);
        query.push(("daily", DAILY_FIELDS.to_string()));
        query.push(("forecast_days", FORECAST_DAYS.to_string()));
        query.push(("timezone", "auto".to_string()));

        self.make_request(&self.forecast_url(), &query).await
    }
}
