use thiserror::Error;

/// Errors produced by the weather resolution pipeline.
///
/// Only [`WeatherError::InvalidInput`] escapes [`crate::WeatherResolver`];
/// every upstream failure is absorbed into a mock-sourced result.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The city string was empty after sanitization
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level failure talking to an upstream provider
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered with a non-success status
    #[error("Upstream request failed with status {status}")]
    UpstreamHttpError { status: u16 },

    /// Upstream answered 2xx but the body could not be decoded
    #[error("Invalid upstream payload: {0}")]
    InvalidPayload(String),
}

impl WeatherError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::UpstreamHttpError {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::InvalidPayload(err.to_string());
        }
        Self::UpstreamUnavailable(err.to_string())
    }
}
