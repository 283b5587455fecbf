use anyhow::Result;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::aggregator::aggregate;
use crate::boundary::Boundary;
use crate::config::PortalConfig;
use crate::constants::FORECAST_UNAVAILABLE;
use crate::fetcher::{fetch_all, fetch_point, ForecastSource, NwsClient};
use crate::formatters::{format_boundary, format_daily_table, format_forecast_cards, format_map};
use crate::icons::classify;
use crate::map::{add_forecast_markers, MapLayer};
use crate::models::{ClassifyForecastRequest, GeoPoint, GetPointForecastRequest, LocationForecast};

/// Forecast portal service that handles MCP requests
#[derive(Clone)]
pub struct ForecastPortal {
    source: Arc<dyn ForecastSource>,
    config: Arc<PortalConfig>,
    tool_router: ToolRouter<Self>,
}

impl ForecastPortal {
    /// Creates a portal backed by the NWS API
    pub fn new(config: PortalConfig) -> Result<Self> {
        let client = NwsClient::new(&config.user_agent, config.api_base.clone())?;
        Ok(Self::with_source(Arc::new(client), config))
    }

    pub fn with_source(source: Arc<dyn ForecastSource>, config: PortalConfig) -> Self {
        Self {
            source,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    fn new_map(&self) -> MapLayer {
        MapLayer::new(
            self.config.center,
            self.config.zoom,
            self.config.center_label.clone(),
        )
    }

    /// Loads the boundary overlay; a failure only drops the overlay
    async fn load_overlay(&self, map: &mut MapLayer) {
        match Boundary::load(&self.config.boundary_path).await {
            Ok(boundary) => map.set_overlay(boundary),
            Err(e) => tracing::error!("{}", e),
        }
    }
}

/// Renders one AOI fetch cycle: centre cards and table, then the map
pub fn render_aoi_report(
    center: GeoPoint,
    results: &[Option<LocationForecast>],
    map: &mut MapLayer,
) -> String {
    if results.iter().all(Option::is_none) {
        return format!("{}\n\n{}", FORECAST_UNAVAILABLE, format_map(map));
    }

    let mut output = String::new();
    match results.iter().flatten().find(|r| r.point == center) {
        Some(forecast) => {
            output.push_str(&format_forecast_cards(forecast));
            output.push_str(&format_daily_table(&aggregate(&forecast.periods)));
            output.push('\n');
        }
        None => tracing::warn!("No forecast for centre point {}", center),
    }

    add_forecast_markers(map, results);
    output.push_str(&format_map(map));
    output
}

#[tool_handler]
impl ServerHandler for ForecastPortal {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "phoenix-forecast".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Point forecasts for the Phoenix metro area from the National Weather Service API. \
                Provides forecast cards, daily summaries and map markers for the area of interest."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl ForecastPortal {
    /// Fetches every AOI point and renders the full report
    #[tool(description = "Get the forecast for the Phoenix area of interest. Fetches every configured point one at a time, then returns forecast cards and a daily summary for the centre point plus temperature-coloured map markers for all points.")]
    async fn get_aoi_forecast(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting AOI forecast for {} points", self.config.points.len());

        let mut map = self.new_map();
        self.load_overlay(&mut map).await;

        let results = fetch_all(
            self.source.as_ref(),
            &self.config.points,
            self.config.inter_delay(),
        )
        .await;

        let report = render_aoi_report(self.config.center, &results, &mut map);

        Ok(CallToolResult::success(vec![Content::text(report)]))
    }

    /// Gets forecast cards and daily summary for one point
    #[tool(description = "Get forecast cards and a daily summary (high, low, precipitation probability, wind) for a US location. Provide latitude and longitude (e.g., latitude: 33.4484, longitude: -112.0740 for Phoenix).")]
    async fn get_point_forecast(
        &self,
        Parameters(request): Parameters<GetPointForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        let point = GeoPoint::new(request.latitude, request.longitude);
        tracing::info!("Getting forecast for coordinates: {}", point);

        if !point.is_valid() {
            return Err(McpError::invalid_params(
                format!("Invalid coordinates: {point}"),
                None,
            ));
        }

        let forecast = fetch_point(self.source.as_ref(), point)
            .await
            .map_err(|e| {
                tracing::warn!("{}", e);
                McpError::internal_error(e.to_string(), None)
            })?;

        let mut output = format_forecast_cards(&forecast);
        output.push_str(&format_daily_table(&aggregate(&forecast.periods)));

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Describes the AOI boundary overlay
    #[tool(description = "Describe the area-of-interest boundary overlay: bounding box, style and the sample points derived from it.")]
    async fn get_boundary(&self) -> Result<CallToolResult, McpError> {
        let boundary = Boundary::load(&self.config.boundary_path)
            .await
            .map_err(|e| {
                tracing::error!("{}", e);
                McpError::internal_error(e.to_string(), None)
            })?;

        Ok(CallToolResult::success(vec![Content::text(format_boundary(
            &boundary,
        ))]))
    }

    /// Maps a short forecast to its icon category
    #[tool(description = "Classify a short forecast text such as 'Mostly Sunny' or 'Chance Showers And Thunderstorms' into an icon category.")]
    async fn classify_forecast(
        &self,
        Parameters(request): Parameters<ClassifyForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        let tag = classify(request.short_forecast.as_deref());

        Ok(CallToolResult::success(vec![Content::text(format!(
            "{} {}",
            tag.glyph(),
            tag.name()
        ))]))
    }
}
