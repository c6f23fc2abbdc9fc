//! HTTP request handlers for the tile API.
//!
//! # Endpoints
//!
//! - `GET /tiles/{layer}/{z}/{x}/{y}.png` - Serve a tile
//! - `PUT /tiles/{layer}/{z}/{x}/{y}.png` - Seed a tile into the store
//! - `GET /layers` - List configured layers
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{StorageError, TileError};
use crate::tile::{TileRequest, TileService, TileSource};

/// Response header naming where the tile bytes came from.
pub const TILE_OUTCOME_HEADER: &str = "x-tile-outcome";

/// Response header naming the filter that chose a placeholder.
pub const TILE_FILTER_HEADER: &str = "x-tile-filter";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the tile service.
#[derive(Clone)]
pub struct AppState {
    /// The tile service for processing tile requests
    pub tile_service: Arc<TileService>,

    /// Cache-Control max-age for stored tiles, in seconds
    pub cache_max_age: u32,
}

impl AppState {
    /// Create a new application state with the given tile service.
    pub fn new(tile_service: TileService) -> Self {
        Self::with_cache_max_age(tile_service, 3600)
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(tile_service: TileService, cache_max_age: u32) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/tiles/{layer}/{z}/{x}/{filename}`
/// where filename is `{y}` or `{y}.png`
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Layer name
    pub layer: String,

    /// Zoom level
    pub z: u32,

    /// Tile column
    pub x: u64,

    /// Tile row with optional .png extension (e.g., "0" or "0.png")
    pub filename: String,
}

impl TilePathParams {
    /// Parse the row from the filename, stripping any .png extension.
    pub fn y(&self) -> Result<u64, std::num::ParseIntError> {
        let y_str = self.filename.strip_suffix(".png").unwrap_or(&self.filename);
        y_str.parse()
    }

    /// Build a tile request from the path.
    pub fn to_request(&self) -> Result<TileRequest, TileError> {
        let y = self.y().map_err(|e| TileError::InvalidCoordinates {
            message: format!("invalid row '{}': {}", self.filename, e),
        })?;
        Ok(TileRequest::new(&self.layer, self.x, y, self.z))
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "invalid_request")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Description of one configured layer.
#[derive(Debug, Serialize)]
pub struct LayerResponse {
    /// Layer name
    pub name: String,

    /// Grid subset name
    pub grid_subset: String,

    /// Lowest covered zoom level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<u32>,

    /// Highest covered zoom level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u32>,

    /// Names of the request filters, in evaluation order
    pub filters: Vec<String>,
}

/// Response from the layers endpoint.
#[derive(Debug, Serialize)]
pub struct LayersResponse {
    pub layers: Vec<LayerResponse>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert TileError to HTTP response.
///
/// 5xx errors are logged at ERROR, 404s at DEBUG, other 4xx at WARN.
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            TileError::LayerNotFound { .. } | TileError::TileNotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            TileError::InvalidCoordinates { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_coordinates")
            }
            TileError::OutsideCoverage(_) => (StatusCode::BAD_REQUEST, "outside_coverage"),
            TileError::StoreNotConfigured => (StatusCode::CONFLICT, "store_not_configured"),
            TileError::Storage(StorageError::Connection(_)) => {
                (StatusCode::BAD_GATEWAY, "connection_error")
            }
            TileError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            TileError::EncodeError { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "encode_error"),
        };
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Wrapper for handler errors to implement IntoResponse.
pub struct HandlerError(pub TileError);

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

impl From<TileError> for HandlerError {
    fn from(err: TileError) -> Self {
        HandlerError(err)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /tiles/{layer}/{z}/{x}/{y}.png`
///
/// # Response
///
/// `200 OK` with a PNG body. The `X-Tile-Outcome` header is `stored` for
/// tiles read from the store, or `blank` / `debug` for placeholders chosen by
/// a filter (named in `X-Tile-Filter`). Placeholders are sent with
/// `Cache-Control: no-store`; the store may be populated later.
pub async fn tile_handler(
    State(state): State<AppState>,
    Path(params): Path<TilePathParams>,
) -> Result<Response, HandlerError> {
    let request = params.to_request()?;
    let tile = state.tile_service.get_tile(&request).await?;

    let cache_control = if tile.source.is_placeholder() {
        "no-store".to_string()
    } else {
        format!("public, max-age={}", state.cache_max_age)
    };

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CACHE_CONTROL, cache_control),
        ],
        tile.data,
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(
        TILE_OUTCOME_HEADER,
        HeaderValue::from_static(tile.source.as_str()),
    );
    if let TileSource::Blank { filter } | TileSource::Debug { filter } = &tile.source {
        match HeaderValue::from_str(filter) {
            Ok(value) => {
                headers.insert(TILE_FILTER_HEADER, value);
            }
            Err(_) => warn!(
                filter = %filter,
                "Filter name is not a valid header value, omitting {}",
                TILE_FILTER_HEADER
            ),
        }
    }

    Ok(response)
}

/// Handle tile seeding.
///
/// # Endpoint
///
/// `PUT /tiles/{layer}/{z}/{x}/{y}.png` with the encoded tile as body.
///
/// # Response
///
/// `204 No Content` once the tile is stored.
pub async fn seed_tile_handler(
    State(state): State<AppState>,
    Path(params): Path<TilePathParams>,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    let request = params.to_request()?;
    state.tile_service.seed_tile(&request, body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle layer listing.
///
/// # Endpoint
///
/// `GET /layers`
pub async fn layers_handler(State(state): State<AppState>) -> Json<LayersResponse> {
    let layers = state
        .tile_service
        .layers()
        .map(|layer| {
            let zoom_range = layer.grid_subset().zoom_range();
            LayerResponse {
                name: layer.name().to_string(),
                grid_subset: layer.grid_subset().name().to_string(),
                min_zoom: zoom_range.map(|(min, _)| min),
                max_zoom: zoom_range.map(|(_, max)| max),
                filters: layer
                    .filters()
                    .iter()
                    .map(|f| f.name().to_string())
                    .collect(),
            }
        })
        .collect();

    Json(LayersResponse { layers })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
