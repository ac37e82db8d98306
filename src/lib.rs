//! Weather lookup by city name for assistants and HTTP clients.
//!
//! A free-text city is geocoded and resolved against Open-Meteo with
//! bounded retries. When the live service cannot answer, deterministic mock
//! data is returned instead, tagged with its provenance.
//!
//! The same [`WeatherResolver`] backs two transports: a JSON HTTP API
//! ([`http`]) and an MCP tool server ([`service`]).

pub mod conditions;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatters;
pub mod http;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod resolver;
pub mod retry;
pub mod sanitize;
pub mod service;
pub mod upstream;

pub use config::{RetryPolicy, WeatherConfig};
pub use error::WeatherError;
pub use events::{EventSink, FileEventLog, ResolutionEvent};
pub use models::{CityForecast, Coordinates, CurrentWeather, ForecastDay, ResolvedResult, Source};
pub use resolver::WeatherResolver;
pub use service::WeatherTools;
pub use upstream::{OpenMeteoUpstream, WeatherUpstream};
