//! API integration tests for tile retrieval, seeding and error handling.
//!
//! Tests verify:
//! - Placeholder tiles for missing tiles, stored tiles for present ones
//! - Seeding tiles through PUT
//! - Error cases (unknown layer, invalid coordinates, storage failures)
//! - HTTP response codes and headers

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tile_gate::{
    create_router, FilterConfig, FilterOutcome, RequestFilter, RouterConfig, TileContext,
    TileLayer, TileService, TileStore,
};

use super::test_utils::{
    filtered_router, grid, is_png, FaultyTileStore, TrackingTileStore, FILTER, LAYER, TILE_SIZE,
};

async fn get(router: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn put(router: &Router, uri: &str, body: &'static [u8]) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "image/png")
        .body(Body::from(body))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn error_type(response: Response) -> String {
    let body = body_bytes(response).await;
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    error["error"].as_str().unwrap().to_string()
}

// =============================================================================
// Tile Retrieval
// =============================================================================

#[tokio::test]
async fn test_missing_tile_is_blank() {
    let store = TrackingTileStore::new();
    let router = filtered_router(Some(Arc::new(store.clone())), FilterConfig::new());

    let response = get(&router, "/tiles/roads/5/3/4.png").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "blank");
    assert_eq!(response.headers().get("x-tile-filter").unwrap(), FILTER);
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");

    let body = body_bytes(response).await;
    assert!(is_png(&body));
    let image = image::load_from_memory(&body).unwrap();
    assert_eq!(image.width(), TILE_SIZE);

    assert_eq!(store.exists_calls(), 1);
    assert_eq!(store.get_calls(), 0, "a blank tile must not read the store");
}

#[tokio::test]
async fn test_missing_tile_is_debug_when_configured() {
    let store = TrackingTileStore::new();
    let router = filtered_router(
        Some(Arc::new(store)),
        FilterConfig::new().with_debug(true),
    );

    let response = get(&router, "/tiles/roads/5/3/4.png").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "debug");
    assert!(is_png(&body_bytes(response).await));
}

#[tokio::test]
async fn test_stored_tile_is_served() {
    let store = TrackingTileStore::new();
    store.insert(LAYER, 3, 4, 5, b"stored tile").await;
    let router = filtered_router(Some(Arc::new(store.clone())), FilterConfig::new());

    let response = get(&router, "/tiles/roads/5/3/4.png").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "stored");
    assert!(response.headers().get("x-tile-filter").is_none());
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );
    assert_eq!(&body_bytes(response).await[..], b"stored tile");

    assert_eq!(store.exists_calls(), 1);
    assert_eq!(store.get_calls(), 1);
}

#[tokio::test]
async fn test_tile_without_png_extension() {
    let store = TrackingTileStore::new();
    store.insert(LAYER, 1, 1, 2, b"tile").await;
    let router = filtered_router(Some(Arc::new(store)), FilterConfig::new());

    let response = get(&router, "/tiles/roads/2/1/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "stored");
}

#[tokio::test]
async fn test_outside_zoom_window_skips_existence_check() {
    let store = TrackingTileStore::new();
    let router = filtered_router(
        Some(Arc::new(store.clone())),
        FilterConfig::new().with_zoom_start(4).with_zoom_stop(8),
    );

    // Below the window the request goes straight to the store, which misses
    let response = get(&router, "/tiles/roads/2/0/0.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_type(response).await, "not_found");

    assert_eq!(store.exists_calls(), 0);
    assert_eq!(store.get_calls(), 1);
}

#[tokio::test]
async fn test_outside_coverage_is_blank() {
    let store = TrackingTileStore::new();
    let router = filtered_router(Some(Arc::new(store.clone())), FilterConfig::new());

    // Zoom 12 is beyond the grid subset (0-10)
    let response = get(&router, "/tiles/roads/12/0/0.png").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "blank");

    // Column 4 does not exist at zoom 2
    let response = get(&router, "/tiles/roads/2/4/0.png").await;
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "blank");

    assert_eq!(store.exists_calls(), 0);
}

#[tokio::test]
async fn test_storage_fault_is_blank() {
    let store = FaultyTileStore::new();
    let router = filtered_router(Some(Arc::new(store.clone())), FilterConfig::new());

    let response = get(&router, "/tiles/roads/5/3/4.png").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "blank");
    assert_eq!(store.exists_calls(), 1);
}

#[tokio::test]
async fn test_storage_fault_on_read_is_bad_gateway() {
    let store = FaultyTileStore::new();
    let router = filtered_router(
        Some(Arc::new(store.clone())),
        FilterConfig::new().with_zoom_start(6),
    );

    let response = get(&router, "/tiles/roads/2/0/0.png").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(error_type(response).await, "connection_error");
    assert_eq!(store.exists_calls(), 0);
}

// =============================================================================
// Request Errors
// =============================================================================

#[tokio::test]
async fn test_unknown_layer() {
    let router = filtered_router(Some(Arc::new(TrackingTileStore::new())), FilterConfig::new());

    let response = get(&router, "/tiles/water/0/0/0.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_type(response).await, "not_found");
}

#[tokio::test]
async fn test_invalid_row() {
    let router = filtered_router(Some(Arc::new(TrackingTileStore::new())), FilterConfig::new());

    let response = get(&router, "/tiles/roads/0/0/abc.png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_type(response).await, "invalid_coordinates");
}

#[tokio::test]
async fn test_invalid_zoom_rejected_by_extractor() {
    let router = filtered_router(Some(Arc::new(TrackingTileStore::new())), FilterConfig::new());

    let response = get(&router, "/tiles/roads/high/0/0.png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unfiltered_layer_outside_coverage() {
    let service = TileService::new(Some(Arc::new(TrackingTileStore::new()) as Arc<dyn TileStore>))
        .unwrap()
        .with_layer(TileLayer::new(LAYER, grid()));
    let router = create_router(service, RouterConfig::new().with_tracing(false));

    let response = get(&router, "/tiles/roads/12/0/0.png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_type(response).await, "outside_coverage");
}

// =============================================================================
// Seeding
// =============================================================================

#[tokio::test]
async fn test_seed_then_fetch() {
    let store = TrackingTileStore::new();
    let router = filtered_router(Some(Arc::new(store.clone())), FilterConfig::new());

    let response = get(&router, "/tiles/roads/3/2/1.png").await;
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "blank");

    let response = put(&router, "/tiles/roads/3/2/1.png", b"seeded").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&router, "/tiles/roads/3/2/1.png").await;
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "stored");
    assert_eq!(&body_bytes(response).await[..], b"seeded");
}

#[tokio::test]
async fn test_seed_without_store() {
    let router = filtered_router(None, FilterConfig::new());

    let response = put(&router, "/tiles/roads/3/2/1.png", b"seeded").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_type(response).await, "store_not_configured");

    // Without a store there is no existence capability, so tiles are blank
    let response = get(&router, "/tiles/roads/3/2/1.png").await;
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "blank");
}

#[tokio::test]
async fn test_seed_storage_failure() {
    let router = filtered_router(Some(Arc::new(FaultyTileStore::new())), FilterConfig::new());

    let response = put(&router, "/tiles/roads/3/2/1.png", b"seeded").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_type(response).await, "storage_error");
}

#[tokio::test]
async fn test_seed_outside_coverage() {
    let router = filtered_router(Some(Arc::new(TrackingTileStore::new())), FilterConfig::new());

    let response = put(&router, "/tiles/roads/11/0/0.png", b"seeded").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_type(response).await, "outside_coverage");
}

// =============================================================================
// Metadata Endpoints
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = filtered_router(None, FilterConfig::new());

    let response = get(&router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_bytes(response).await;
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_layers() {
    let router = filtered_router(None, FilterConfig::new());

    let response = get(&router, "/layers").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_bytes(response).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let layers = json["layers"].as_array().unwrap();

    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0]["name"], LAYER);
    assert_eq!(layers[0]["grid_subset"], "EPSG:3857");
    assert_eq!(layers[0]["min_zoom"], 0);
    assert_eq!(layers[0]["max_zoom"], 10);
    assert_eq!(layers[0]["filters"], serde_json::json!([FILTER]));
}

#[tokio::test]
async fn test_cors_preflight_allows_put() {
    let router = filtered_router(None, FilterConfig::new());

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/tiles/roads/0/0/0.png")
        .header("origin", "https://maps.example.com")
        .header("access-control-request-method", "PUT")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allowed.contains("PUT"));
}

// =============================================================================
// Filter Names and Missing Stores
// =============================================================================

/// Filter that blanks every tile under a fixed name.
struct NamedBlankFilter(&'static str);

#[async_trait]
impl RequestFilter for NamedBlankFilter {
    fn name(&self) -> &str {
        self.0
    }

    async fn apply(&self, _ctx: &TileContext<'_>) -> FilterOutcome {
        FilterOutcome::Blank {
            filter: Arc::from(self.0),
        }
    }
}

#[tokio::test]
async fn test_filter_name_not_valid_as_header() {
    let layer = TileLayer::new(LAYER, grid())
        .with_filter(Arc::new(NamedBlankFilter("edge\nfilter")))
        .unwrap();
    let service = TileService::new(None).unwrap().with_layer(layer);
    let router = create_router(service, RouterConfig::new().with_tracing(false));

    let response = get(&router, "/tiles/roads/3/1/1.png").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-tile-outcome").unwrap(), "blank");
    assert!(response.headers().get("x-tile-filter").is_none());
}

#[tokio::test]
async fn test_no_store_serves_only_placeholders() {
    // Outside the filter window the request passes through and finds nothing
    let router = filtered_router(None, FilterConfig::new().with_zoom_start(5));
    let response = get(&router, "/tiles/roads/2/0/0.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_type(response).await, "not_found");

    // Without any filter nothing is answered with a placeholder
    let service = TileService::new(None)
        .unwrap()
        .with_layer(TileLayer::new(LAYER, grid()));
    let router = create_router(service, RouterConfig::new().with_tracing(false));
    let response = get(&router, "/tiles/roads/6/0/0.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
