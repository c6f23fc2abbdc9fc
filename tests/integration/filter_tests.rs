//! Integration tests for the existing-tile filter inside a tile service.
//!
//! Tests verify:
//! - The five decision paths (coverage, zoom window, present, missing, debug)
//! - Storage faults and stores without existence checks
//! - Filter chains mixing the existing-tile filter with custom filters
//! - Concurrent requests sharing one service

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use tile_gate::{
    ExistingTileFilter, FilterConfig, FilterError, FilterOutcome, MemoryTileStore, RequestFilter,
    TileContext, TileError, TileLayer, TileRequest, TileService, TileSource, UpdateOperation,
};

use super::test_utils::{
    filtered_service, grid, FaultyTileStore, OpaqueTileStore, TrackingTileStore, FILTER, LAYER,
};

fn blank() -> TileSource {
    TileSource::Blank {
        filter: Arc::from(FILTER),
    }
}

// =============================================================================
// Decision Paths
// =============================================================================

#[tokio::test]
async fn test_outside_coverage_blank_without_lookup() {
    let store = TrackingTileStore::new();
    let service = filtered_service(Some(Arc::new(store.clone())), FilterConfig::new());

    let response = service
        .get_tile(&TileRequest::new(LAYER, 0, 0, 11))
        .await
        .unwrap();

    assert_eq!(response.source, blank());
    assert_eq!(store.exists_calls(), 0);
}

#[tokio::test]
async fn test_outside_coverage_blank_even_in_debug_mode() {
    let service = filtered_service(
        Some(Arc::new(TrackingTileStore::new())),
        FilterConfig::new().with_debug(true),
    );

    let response = service
        .get_tile(&TileRequest::new(LAYER, 9, 0, 3))
        .await
        .unwrap();

    assert_eq!(response.source, blank());
}

#[tokio::test]
async fn test_zoom_window_is_inclusive() {
    let store = TrackingTileStore::new();
    let service = filtered_service(
        Some(Arc::new(store.clone())),
        FilterConfig::new().with_zoom_start(5).with_zoom_stop(10),
    );

    // Zoom 4 is outside: the filter steps aside and the store misses
    let result = service.get_tile(&TileRequest::new(LAYER, 0, 0, 4)).await;
    assert!(matches!(result, Err(TileError::TileNotFound { zoom: 4, .. })));
    assert_eq!(store.exists_calls(), 0);

    // Both bounds are checked
    for zoom in [5, 10] {
        let response = service
            .get_tile(&TileRequest::new(LAYER, 0, 0, zoom))
            .await
            .unwrap();
        assert_eq!(response.source, blank());
    }
    assert_eq!(store.exists_calls(), 2);
}

#[tokio::test]
async fn test_present_tile_proceeds() {
    let store = TrackingTileStore::new();
    store.insert(LAYER, 6, 7, 8, b"tile").await;
    let service = filtered_service(Some(Arc::new(store.clone())), FilterConfig::new());

    let response = service
        .get_tile(&TileRequest::new(LAYER, 6, 7, 8))
        .await
        .unwrap();

    assert_eq!(response.source, TileSource::Stored);
    assert_eq!(&response.data[..], b"tile");
}

#[tokio::test]
async fn test_missing_tile_in_other_layer_is_missing() {
    let store = TrackingTileStore::new();
    store.insert("water", 6, 7, 8, b"tile").await;
    let service = filtered_service(Some(Arc::new(store)), FilterConfig::new());

    let response = service
        .get_tile(&TileRequest::new(LAYER, 6, 7, 8))
        .await
        .unwrap();

    assert_eq!(response.source, blank());
}

#[tokio::test]
async fn test_missing_tile_debug_placeholder() {
    let service = filtered_service(
        Some(Arc::new(TrackingTileStore::new())),
        FilterConfig::new().with_debug(true),
    );

    let response = service
        .get_tile(&TileRequest::new(LAYER, 6, 7, 8))
        .await
        .unwrap();

    assert_eq!(
        response.source,
        TileSource::Debug {
            filter: Arc::from(FILTER)
        }
    );
    assert_eq!(response.data, service.placeholders().debug());
}

// =============================================================================
// Degraded Stores
// =============================================================================

#[tokio::test]
async fn test_existence_fault_counts_as_missing() {
    let store = FaultyTileStore::new();
    let service = filtered_service(Some(Arc::new(store.clone())), FilterConfig::new());

    let response = service
        .get_tile(&TileRequest::new(LAYER, 1, 2, 3))
        .await
        .unwrap();

    assert_eq!(response.source, blank());
    assert_eq!(store.exists_calls(), 1);
}

#[tokio::test]
async fn test_store_without_existence_check() {
    let store = OpaqueTileStore::new();
    let service = filtered_service(Some(Arc::new(store)), FilterConfig::new());

    let request = TileRequest::new(LAYER, 1, 2, 3);
    service
        .seed_tile(&request, Bytes::from_static(b"tile"))
        .await
        .unwrap();

    // The tile is stored, but the filter cannot see it
    let response = service.get_tile(&request).await.unwrap();
    assert_eq!(response.source, blank());
}

#[tokio::test]
async fn test_memory_store_existence() {
    let service = filtered_service(
        Some(Arc::new(MemoryTileStore::with_capacity(1024 * 1024))),
        FilterConfig::new(),
    );
    let request = TileRequest::new(LAYER, 1, 2, 3);

    assert_eq!(service.get_tile(&request).await.unwrap().source, blank());

    service
        .seed_tile(&request, Bytes::from_static(b"tile"))
        .await
        .unwrap();

    let response = service.get_tile(&request).await.unwrap();
    assert_eq!(response.source, TileSource::Stored);
}

// =============================================================================
// Filter Chains
// =============================================================================

/// Filter that records every tile it sees and always proceeds.
#[derive(Default)]
struct CountingFilter {
    calls: AtomicUsize,
}

#[async_trait]
impl RequestFilter for CountingFilter {
    fn name(&self) -> &str {
        "counting"
    }

    async fn apply(&self, _ctx: &TileContext<'_>) -> FilterOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FilterOutcome::Proceed
    }
}

#[tokio::test]
async fn test_chain_stops_at_first_blank() {
    let store = TrackingTileStore::new();
    store.insert(LAYER, 0, 0, 1, b"tile").await;

    let counting = Arc::new(CountingFilter::default());
    let existing = ExistingTileFilter::new(FILTER, FilterConfig::new()).unwrap();
    let layer = TileLayer::new(LAYER, grid())
        .with_filter(Arc::new(existing))
        .unwrap()
        .with_filter(counting.clone())
        .unwrap();
    let service = TileService::new(Some(Arc::new(store))).unwrap().with_layer(layer);

    // Present: both filters run
    let response = service
        .get_tile(&TileRequest::new(LAYER, 0, 0, 1))
        .await
        .unwrap();
    assert_eq!(response.source, TileSource::Stored);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);

    // Missing: the chain ends at the existing-tile filter
    let response = service
        .get_tile(&TileRequest::new(LAYER, 1, 0, 1))
        .await
        .unwrap();
    assert_eq!(response.source, blank());
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_updates_are_unsupported() {
    let filter = ExistingTileFilter::new(FILTER, FilterConfig::new()).unwrap();
    let layer = TileLayer::new(LAYER, grid());

    assert!(filter.supported_updates().is_empty());
    assert!(!filter.supports(UpdateOperation::ZoomRange));

    let result = filter.update_zoom_range(&layer, "EPSG:3857", 0, 5);
    assert_eq!(
        result,
        Err(FilterError::UnsupportedUpdate {
            filter: FILTER.to_string(),
            operation: UpdateOperation::ZoomRange,
        })
    );

    let result = filter.update_layer(&layer, "EPSG:3857");
    assert!(matches!(
        result,
        Err(FilterError::UnsupportedUpdate {
            operation: UpdateOperation::Layer,
            ..
        })
    ));
}

#[test]
fn test_config_from_layer_json() {
    let config: FilterConfig =
        serde_json::from_str(r#"{"zoomStart": 3, "zoomStop": 9, "debug": true}"#).unwrap();
    let filter = ExistingTileFilter::new(FILTER, config).unwrap();

    assert_eq!(filter.config().zoom_start(), Some(3));
    assert_eq!(filter.config().zoom_stop(), Some(9));
    assert!(filter.config().is_debug());

    let inverted: FilterConfig =
        serde_json::from_str(r#"{"zoomStart": 9, "zoomStop": 3}"#).unwrap();
    assert_eq!(
        ExistingTileFilter::new(FILTER, inverted).unwrap_err(),
        FilterError::InvalidZoomRange {
            zoom_start: 9,
            zoom_stop: 3
        }
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_requests() {
    let store = TrackingTileStore::new();
    for column in 0..8 {
        if column % 2 == 0 {
            store.insert(LAYER, column, 0, 3, b"tile").await;
        }
    }
    let service = Arc::new(filtered_service(
        Some(Arc::new(store.clone())),
        FilterConfig::new(),
    ));

    let handles: Vec<_> = (0..8u64)
        .map(|column| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let response = service
                    .get_tile(&TileRequest::new(LAYER, column, 0, 3))
                    .await
                    .unwrap();
                (column, response.source)
            })
        })
        .collect();

    for handle in handles {
        let (column, source) = handle.await.unwrap();
        if column % 2 == 0 {
            assert_eq!(source, TileSource::Stored);
        } else {
            assert_eq!(source, blank());
        }
    }

    assert_eq!(store.exists_calls(), 8);
}
