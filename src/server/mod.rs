mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::tools::ToolSurface;

pub fn build_router(tools: ToolSurface) -> Router {
    let state = Arc::new(AppState { tools });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/tools", get(handlers::tool_list))
        .route("/api/tools/{name}", post(handlers::call_tool))
        .route("/api/places", get(handlers::places))
        .route("/api/places/near", get(handlers::places_near))
        .route("/api/places/{id}", get(handlers::place_by_id))
        .route("/api/location", get(handlers::location))
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/nearby", get(handlers::nearby))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(tools: ToolSurface, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(tools);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "Paraguay tourism server listening");

    axum::serve(listener, app).await
}
