use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};

use crate::error::WeatherError;
use crate::events::{log_text, FileEventLog};
use crate::formatters::{format_current, format_forecast};
use crate::models::{CityRequest, LogsRequest};
use crate::resolver::WeatherResolver;

/// Weather tools served over MCP
#[derive(Clone)]
pub struct WeatherTools {
    resolver: WeatherResolver,
    event_log: Option<FileEventLog>,
    tool_router: ToolRouter<Self>,
}

impl WeatherTools {
    /// Creates a new tool service around a resolver
    pub fn new(resolver: WeatherResolver, event_log: Option<FileEventLog>) -> Self {
        Self {
            resolver,
            event_log,
            tool_router: Self::tool_router(),
        }
    }

    async fn render_current(&self, city: &str) -> Result<String, McpError> {
        let result = self
            .resolver
            .resolve_current(city)
            .await
            .map_err(to_mcp_error)?;
        Ok(format_current(&result))
    }

    async fn render_forecast(&self, city: &str) -> Result<String, McpError> {
        let report = self
            .resolver
            .resolve_forecast(city)
            .await
            .map_err(to_mcp_error)?;
        Ok(format_forecast(&report))
    }
}

fn to_mcp_error(err: WeatherError) -> McpError {
    if err.is_invalid_input() {
        McpError::invalid_params(format!("Please provide a city name: {}", err), None)
    } else {
        McpError::internal_error(format!("Failed to resolve weather: {}", err), None)
    }
}

#[tool_handler]
impl ServerHandler for WeatherTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weather-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Current weather and 5-day forecasts for any city name, powered by Open-Meteo. \
                When the live service cannot answer, clearly labelled mock data is returned."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl WeatherTools {
    /// Gets current weather for a city
    #[tool(description = "Get current weather for a city. Provide the city name (e.g., 'Berlin', 'New York'). Phrases like 'in Tokyo' are accepted.")]
    async fn get_current_weather(
        &self,
        Parameters(request): Parameters<CityRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting current weather for city: {}", request.city);

        let formatted = self.render_current(&request.city).await?;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Gets a 5-day forecast for a city
    #[tool(description = "Get a 5-day weather forecast for a city. Provide the city name (e.g., 'Paris', 'near Lyon').")]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<CityRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting forecast for city: {}", request.city);

        let formatted = self.render_forecast(&request.city).await?;

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Shows the weather event log
    #[tool(description = "View the weather service event log. Optionally limit to the last N lines.")]
    async fn weather_logs(
        &self,
        Parameters(request): Parameters<LogsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = log_text(self.event_log.as_ref(), request.max_lines);

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}
