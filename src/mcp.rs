//! MCP server over stdio.
//!
//! Each tool of the [`ToolSurface`] is registered with rmcp under the same
//! name and description used by the HTTP host. Results go back to the
//! client as a single JSON text block. Stdout carries the protocol, so all
//! logging stays on stderr.

use crate::tools::{
    DistanceArgs, GeocodeArgs, GetPlaceArgs, LocateArgs, NearbyArgs, ToolError, ToolSurface,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::transport::stdio;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct TourismMcpServer {
    tools: Arc<ToolSurface>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TourismMcpServer {
    pub fn new(tools: ToolSurface) -> Self {
        Self {
            tools: Arc::new(tools),
            tool_router: Self::tool_router(),
        }
    }

    /// Run a tool on the blocking pool; providers use blocking HTTP.
    async fn run<F>(&self, name: &'static str, f: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&ToolSurface) -> Result<Value, ToolError> + Send + 'static,
    {
        let tools = self.tools.clone();
        let result = tokio::task::spawn_blocking(move || f(&tools))
            .await
            .map_err(|e| McpError::internal_error(format!("tool task failed: {}", e), None))?;

        match result {
            Ok(value) => {
                tracing::info!(tool = name, "mcp tool call ok");
                Ok(CallToolResult::success(vec![Content::text(value.to_string())]))
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "mcp tool call rejected");
                Err(to_mcp_error(e))
            }
        }
    }

    #[tool(
        description = "Lists every tourist place in Paraguay with name, city, category and GPS coordinates (lat, lng)."
    )]
    async fn list_all_tourist_places(&self) -> Result<CallToolResult, McpError> {
        self.run("list_all_tourist_places", |t| {
            Ok(serde_json::to_value(t.list_all_tourist_places())?)
        })
        .await
    }

    #[tool(description = "Returns all information about a tourist place by its ID.")]
    async fn get_tourist_place_by_id(
        &self,
        Parameters(args): Parameters<GetPlaceArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_tourist_place_by_id", move |t| {
            Ok(serde_json::to_value(t.get_tourist_place_by_id(&args.place_id))?)
        })
        .await
    }

    #[tool(description = "Finds tourist places within a distance of a given point, nearest first.")]
    async fn find_tourist_places_by_distance(
        &self,
        Parameters(args): Parameters<DistanceArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.run("find_tourist_places_by_distance", move |t| {
            let listing =
                t.find_tourist_places_by_distance(args.latitude, args.longitude, args.max_distance_km)?;
            Ok(serde_json::to_value(listing)?)
        })
        .await
    }

    #[tool(description = "Returns the approximate current location based on the IP address.")]
    async fn get_current_location(
        &self,
        Parameters(args): Parameters<LocateArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_current_location", move |t| {
            Ok(serde_json::to_value(t.get_current_location(args.ip.as_deref()))?)
        })
        .await
    }

    #[tool(description = "Converts a city, address or place name into latitude and longitude.")]
    async fn geocode_location(
        &self,
        Parameters(args): Parameters<GeocodeArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.run("geocode_location", move |t| {
            Ok(serde_json::to_value(t.geocode_location(&args.query, &args.country_code))?)
        })
        .await
    }

    #[tool(
        description = "Locates you by IP and finds tourist places within a distance, all in one call."
    )]
    async fn find_nearby_tourist_places(
        &self,
        Parameters(args): Parameters<NearbyArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.run("find_nearby_tourist_places", move |t| {
            t.find_nearby_tourist_places(args.max_distance_km)
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for TourismMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Paraguay Tourism: tourist places with GPS coordinates, distance search, IP location and geocoding. Use geocode_location or get_current_location to obtain coordinates before searching by distance.".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn to_mcp_error(e: ToolError) -> McpError {
    match e {
        ToolError::Encode(_) => McpError::internal_error(e.to_string(), None),
        _ => McpError::invalid_params(e.to_string(), None),
    }
}

/// Serve the tools to one MCP client on stdin/stdout until it disconnects.
pub async fn serve_stdio(tools: ToolSurface) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("MCP server listening on stdio");
    let service = TourismMcpServer::new(tools).serve(stdio()).await?;
    let reason = service.waiting().await?;
    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}
