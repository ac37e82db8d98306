//! Binary entry point for `weather-gateway`.
//!
//! Logging goes to stderr so stdout stays free for the MCP protocol.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_gateway::WeatherConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    let config = WeatherConfig::from_env();
    tracing::debug!("Loaded configuration: {:?}", config);

    cli.run(config).await
}
