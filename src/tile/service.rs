//! Tile Service for resolving tile requests.
//!
//! The TileService is the main entry point for tile requests. It orchestrates:
//! - Layer lookup
//! - The layer's request filter chain
//! - Placeholder selection for filtered requests
//! - Store access for everything else
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                             │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                    get_tile()                           │    │
//! │  │  1. Find layer         3. Blank/Debug → placeholder     │    │
//! │  │  2. Run filters        4. Proceed → read from store     │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │           │                    │                    │           │
//! │           ▼                    ▼                    ▼           │
//! │    ┌───────────┐      ┌──────────────┐    ┌──────────────────┐  │
//! │    │ TileLayer │      │  TileStore   │    │ PlaceholderTiles │  │
//! │    └───────────┘      └──────────────┘    └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::error::TileError;
use crate::filter::FilterOutcome;
use crate::grid::{Coverage, TileIndex, TileKey};
use crate::storage::TileStore;

use super::layer::TileLayer;
use super::placeholder::{PlaceholderTiles, DEFAULT_TILE_SIZE};

// =============================================================================
// Tile Request
// =============================================================================

/// A request for a tile.
#[derive(Debug, Clone)]
pub struct TileRequest {
    /// Layer name
    pub layer: String,

    /// Requested tile
    pub index: TileIndex,
}

impl TileRequest {
    pub fn new(layer: impl Into<String>, column: u64, row: u64, zoom: u32) -> Self {
        Self {
            layer: layer.into(),
            index: TileIndex::new(column, row, zoom),
        }
    }
}

// =============================================================================
// Tile Response
// =============================================================================

/// Where the bytes of a tile response came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSource {
    /// Read from the tile store
    Stored,

    /// Blank placeholder, chosen by the named filter
    Blank { filter: Arc<str> },

    /// Debug placeholder, chosen by the named filter
    Debug { filter: Arc<str> },
}

impl TileSource {
    /// Short label, used in the `X-Tile-Outcome` response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            TileSource::Stored => "stored",
            TileSource::Blank { .. } => "blank",
            TileSource::Debug { .. } => "debug",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, TileSource::Stored)
    }
}

/// Response from the tile service.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// Encoded PNG data
    pub data: Bytes,

    /// Origin of the data
    pub source: TileSource,
}

// =============================================================================
// Tile Service
// =============================================================================

/// Service resolving tile requests against layers and a tile store.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use tile_gate::filter::{ExistingTileFilter, FilterConfig};
/// use tile_gate::grid::GridSubset;
/// use tile_gate::storage::MemoryTileStore;
/// use tile_gate::tile::{TileLayer, TileRequest, TileService};
///
/// let filter = ExistingTileFilter::new("existing", FilterConfig::new())?;
/// let layer = TileLayer::new("roads", GridSubset::full_pyramid("EPSG:3857", 0, 18))
///     .with_filter(Arc::new(filter))?;
///
/// let service = TileService::new(Some(Arc::new(MemoryTileStore::new())))?.with_layer(layer);
///
/// let response = service.get_tile(&TileRequest::new("roads", 0, 0, 0)).await?;
/// println!("{} bytes ({})", response.data.len(), response.source.as_str());
/// ```
pub struct TileService {
    /// Layers by name
    layers: BTreeMap<String, TileLayer>,

    /// Tile store, if one is configured
    store: Option<Arc<dyn TileStore>>,

    /// Blank and debug tiles
    placeholders: PlaceholderTiles,
}

impl TileService {
    /// Create a service with default-sized placeholder tiles.
    pub fn new(store: Option<Arc<dyn TileStore>>) -> Result<Self, TileError> {
        Ok(Self::with_placeholders(
            store,
            PlaceholderTiles::new(DEFAULT_TILE_SIZE)?,
        ))
    }

    /// Create a service with the given placeholder tiles.
    pub fn with_placeholders(
        store: Option<Arc<dyn TileStore>>,
        placeholders: PlaceholderTiles,
    ) -> Self {
        Self {
            layers: BTreeMap::new(),
            store,
            placeholders,
        }
    }

    /// Add a layer. A layer with the same name is replaced.
    pub fn with_layer(mut self, layer: TileLayer) -> Self {
        self.add_layer(layer);
        self
    }

    /// Add a layer. A layer with the same name is replaced.
    pub fn add_layer(&mut self, layer: TileLayer) {
        self.layers.insert(layer.name().to_string(), layer);
    }

    /// Look up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.get(name)
    }

    /// All layers, ordered by name.
    pub fn layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.values()
    }

    /// Names of all layers, sorted.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    /// The configured tile store.
    pub fn store(&self) -> Option<&dyn TileStore> {
        self.store.as_deref()
    }

    pub fn placeholders(&self) -> &PlaceholderTiles {
        &self.placeholders
    }

    /// Resolve a tile request.
    ///
    /// Runs the layer's filters first. A filtered request is answered with a
    /// placeholder; otherwise the tile is read from the store.
    ///
    /// # Errors
    ///
    /// - `LayerNotFound` if no layer has the requested name
    /// - `OutsideCoverage` if the tile is outside the layer's grid subset
    ///   (only reachable when no filter blanked it first)
    /// - `TileNotFound` if the store has no data for the tile, or no store
    ///   is configured
    /// - `Storage` if the store read fails
    pub async fn get_tile(&self, request: &TileRequest) -> Result<TileResponse, TileError> {
        let layer = self.find_layer(&request.layer)?;
        let index = request.index;

        match layer.apply_filters(index, self.store()).await {
            FilterOutcome::Proceed => {}
            FilterOutcome::Blank { filter } => {
                debug!(layer = layer.name(), tile = %index, filter = %filter, "Serving blank tile");
                return Ok(TileResponse {
                    data: self.placeholders.blank(),
                    source: TileSource::Blank { filter },
                });
            }
            FilterOutcome::DebugPlaceholder { filter } => {
                debug!(layer = layer.name(), tile = %index, filter = %filter, "Serving debug tile");
                return Ok(TileResponse {
                    data: self.placeholders.debug(),
                    source: TileSource::Debug { filter },
                });
            }
        }

        layer.grid_subset().check_coverage(&index)?;

        let not_found = || TileError::TileNotFound {
            layer: layer.name().to_string(),
            column: index.column,
            row: index.row,
            zoom: index.zoom,
        };

        let store = self.store().ok_or_else(not_found)?;
        let data = store
            .get_tile(&TileKey::new(layer.name(), index))
            .await?
            .ok_or_else(not_found)?;

        Ok(TileResponse {
            data,
            source: TileSource::Stored,
        })
    }

    /// Write a tile into the store.
    ///
    /// Filters are not consulted; only the layer's coverage is checked.
    pub async fn seed_tile(&self, request: &TileRequest, data: Bytes) -> Result<(), TileError> {
        let layer = self.find_layer(&request.layer)?;
        layer.grid_subset().check_coverage(&request.index)?;

        let store = self.store().ok_or(TileError::StoreNotConfigured)?;
        store
            .put_tile(TileKey::new(layer.name(), request.index), data)
            .await?;

        debug!(
            layer = layer.name(),
            tile = %request.index,
            store = store.identifier(),
            "Seeded tile"
        );
        Ok(())
    }

    fn find_layer(&self, name: &str) -> Result<&TileLayer, TileError> {
        self.layer(name).ok_or_else(|| TileError::LayerNotFound {
            layer: name.to_string(),
        })
    }
}
