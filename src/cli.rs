use std::sync::Arc;

use clap::{Parser, Subcommand};
use rmcp::ServiceExt;

use weather_gateway::events::{FanoutSink, TracingSink};
use weather_gateway::formatters::{format_current, format_forecast};
use weather_gateway::http::{run_http_server, AppState};
use weather_gateway::{EventSink, FileEventLog, WeatherConfig, WeatherResolver, WeatherTools};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-gateway", version, about = "City weather over HTTP and MCP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the JSON HTTP API.
    ServeHttp {
        /// Port to listen on; overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Serve the MCP tools over stdio.
    ServeMcp,

    /// Print current weather for a city.
    Current {
        /// City name, e.g. "Berlin" or "in New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Print the JSON result instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print a 5-day forecast for a city.
    Forecast {
        /// City name.
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Print the JSON result instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self, config: WeatherConfig) -> anyhow::Result<()> {
        let event_log = config.log_file.clone().map(FileEventLog::new);

        let mut sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(TracingSink)];
        if let Some(log) = &event_log {
            sinks.push(Arc::new(log.clone()));
        }
        let resolver = WeatherResolver::from_config(&config, Arc::new(FanoutSink::new(sinks)))?;

        match self.command {
            Command::ServeHttp { port } => {
                let state = AppState {
                    resolver,
                    event_log,
                };
                run_http_server(state, port.unwrap_or(config.port)).await?;
            }
            Command::ServeMcp => {
                tracing::info!("Starting MCP weather server");
                let server = WeatherTools::new(resolver, event_log)
                    .serve(rmcp::transport::stdio())
                    .await?;
                server.waiting().await?;
                tracing::info!("Server shutdown complete");
            }
            Command::Current { city, json } => {
                let city = city.join(" ");
                let result = resolver.resolve_current(&city).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!("{}", format_current(&result));
                }
            }
            Command::Forecast { city, json } => {
                let city = city.join(" ");
                let report = resolver.resolve_forecast(&city).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report.forecast)?);
                } else {
                    print!("{}", format_forecast(&report));
                }
            }
        }

        Ok(())
    }
}
