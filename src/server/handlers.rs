use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::location::DEFAULT_COUNTRY_CODE;
use crate::nearby::DEFAULT_RADIUS_KM;
use crate::tools::{ToolDescriptor, ToolError};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<ToolError> for ApiError {
    fn from(e: ToolError) -> Self {
        let status = match &e {
            ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
            ToolError::InvalidArguments { .. }
            | ToolError::InvalidCoordinates { .. }
            | ToolError::InvalidRadius(_) => StatusCode::BAD_REQUEST,
            ToolError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, e.to_string())
    }
}

/// Run a tool off the async runtime; provider calls block.
async fn run_tool(state: Arc<AppState>, name: String, args: Value) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();
    let tool = name.clone();
    let result = tokio::task::spawn_blocking(move || state.tools.call(&name, args))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("tool task failed: {}", e)))?;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(value) => {
            tracing::info!(tool = %tool, elapsed_ms, "tool call ok");
            Ok(Json(value))
        }
        Err(e) => {
            tracing::warn!(tool = %tool, elapsed_ms, error = %e, "tool call rejected");
            Err(e.into())
        }
    }
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

// ─── GET /api/tools ──────────────────────────────────────────────

pub async fn tool_list(State(state): State<Arc<AppState>>) -> Json<&'static [ToolDescriptor]> {
    Json(state.tools.descriptors())
}

// ─── POST /api/tools/{name} ──────────────────────────────────────

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let args = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("invalid JSON body: {}", e)))?
    };
    run_tool(state, name, args).await
}

// ─── GET /api/places ─────────────────────────────────────────────

pub async fn places(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    run_tool(state, "list_all_tourist_places".into(), Value::Null).await
}

// ─── GET /api/places/{id} ────────────────────────────────────────

pub async fn place_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    run_tool(state, "get_tourist_place_by_id".into(), json!({ "place_id": id })).await
}

// ─── GET /api/places/near ────────────────────────────────────────

#[derive(Deserialize)]
pub struct NearQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
}

pub async fn places_near(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearQuery>,
) -> Result<Json<Value>, ApiError> {
    let args = json!({
        "latitude": params.lat,
        "longitude": params.lng,
        "max_distance_km": params.radius,
    });
    run_tool(state, "find_tourist_places_by_distance".into(), args).await
}

// ─── GET /api/location ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct LocationQuery {
    pub ip: Option<String>,
}

pub async fn location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<Value>, ApiError> {
    run_tool(state, "get_current_location".into(), json!({ "ip": params.ip })).await
}

// ─── GET /api/geocode ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub query: Option<String>,
    pub country: Option<String>,
}

pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<Value>, ApiError> {
    let query = params.query.as_deref().unwrap_or("");
    if query.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter"));
    }
    let args = json!({
        "query": query,
        "country_code": params.country.as_deref().unwrap_or(DEFAULT_COUNTRY_CODE),
    });
    run_tool(state, "geocode_location".into(), args).await
}

// ─── GET /api/nearby ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub radius: Option<f64>,
}

pub async fn nearby(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<Value>, ApiError> {
    let args = json!({ "max_distance_km": params.radius.unwrap_or(DEFAULT_RADIUS_KM) });
    run_tool(state, "find_nearby_tourist_places".into(), args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::location::resolver::stubs::*;
    use crate::location::LocationError;
    use crate::tools::ToolSurface;

    fn state() -> Arc<AppState> {
        let resolver = resolver(
            stub_ip(Err(LocationError::Network {
                provider: "ip-api",
                message: "offline".into(),
            })),
            stub_geocoder(Ok(asuncion_geocoded("Asunción"))),
        );
        Arc::new(AppState {
            tools: ToolSurface::new(Arc::new(Catalog::builtin().unwrap()), resolver),
        })
    }

    #[tokio::test]
    async fn test_call_tool_empty_body() {
        let Json(v) = call_tool(
            State(state()),
            Path("list_all_tourist_places".into()),
            Bytes::new(),
        )
        .await
        .unwrap();
        assert!(v["total"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_call_tool_unknown_is_404() {
        let err = call_tool(State(state()), Path("nope".into()), Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_tool_bad_json_is_400() {
        let err = call_tool(
            State(state()),
            Path("get_tourist_place_by_id".into()),
            Bytes::from_static(b"{not json"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_places_near_invalid_coordinates_is_400() {
        let err = places_near(
            State(state()),
            Query(NearQuery {
                lat: 123.0,
                lng: 0.0,
                radius: 10.0,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_offline_is_soft_failure() {
        let Json(v) = nearby(State(state()), Query(NearbyQuery { radius: None }))
            .await
            .unwrap();
        assert_eq!(v["success"], false);
        assert!(v["suggestion"].is_string());
    }

    #[tokio::test]
    async fn test_geocode_requires_query() {
        let err = geocode(
            State(state()),
            Query(GeocodeQuery {
                query: Some("  ".into()),
                country: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let Json(v) = geocode(
            State(state()),
            Query(GeocodeQuery {
                query: Some("Asunción".into()),
                country: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(v["success"], true);
    }
}
