//! # Tile Gate
//!
//! A map tile front end that answers requests for tiles known to be absent
//! from the tile store with a blank (or debug) placeholder, so that sparse
//! tile sets do not cost a store round trip or a render per empty tile.
//!
//! ## Features
//!
//! - **Existing-tile filter**: Short-circuits requests for tiles the store does not hold
//! - **Zoom windows**: The filter only runs inside an optional inclusive zoom range
//! - **Grid coverage**: Tiles outside a layer's grid subset are always blank
//! - **Pluggable stores**: In-memory LRU store or S3-compatible object storage
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`grid`] - Tile coordinates and grid subset coverage
//! - [`storage`] - Tile stores and the existence capability
//! - [`filter`] - Request filters, including the existing-tile filter
//! - [`tile`] - Layers, placeholder tiles and the tile service
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tile_gate::{
//!     create_router, ExistingTileFilter, FilterConfig, GridSubset, MemoryTileStore,
//!     RouterConfig, TileLayer, TileService,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let filter = ExistingTileFilter::new(
//!         "existing-tile",
//!         FilterConfig::new().with_zoom_start(4).with_zoom_stop(16),
//!     )?;
//!     let layer = TileLayer::new("roads", GridSubset::full_pyramid("EPSG:3857", 0, 18))
//!         .with_filter(Arc::new(filter))?;
//!
//!     let service = TileService::new(Some(Arc::new(MemoryTileStore::new())))?.with_layer(layer);
//!     let router = create_router(service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod server;
pub mod storage;
pub mod tile;

// Re-export commonly used types
pub use config::{Config, StoreKind};
pub use error::{CoverageError, FilterError, StorageError, TileError};
pub use filter::{
    ExistingTileFilter, FilterConfig, FilterOutcome, RequestFilter, TileContext, UpdateOperation,
};
pub use grid::{Coverage, GridSubset, TileIndex, TileKey, ZoomExtent};
pub use server::{create_router, AppState, RouterConfig};
pub use storage::{
    create_s3_client, MemoryTileStore, S3TileStore, TileExistence, TileStore,
    DEFAULT_MEMORY_STORE_CAPACITY,
};
pub use tile::{PlaceholderTiles, TileLayer, TileRequest, TileResponse, TileService, TileSource};
