//! The request filter interface.
//!
//! Every filter kind implements [`RequestFilter`]. Reconfiguration operations
//! are optional: a filter lists the ones it supports in
//! [`RequestFilter::supported_updates`], and the default implementations of
//! the update methods fail with [`FilterError::UnsupportedUpdate`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FilterError;
use crate::grid::{Coverage, TileIndex};
use crate::storage::{TileExistence, TileStore};
use crate::tile::TileLayer;

// =============================================================================
// Outcome
// =============================================================================

/// Decision returned by a request filter.
///
/// `Blank` and `DebugPlaceholder` are control signals, not errors: they end
/// the filter chain normally and tell the caller which placeholder to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Continue normal handling of the request.
    Proceed,

    /// Serve an empty tile.
    Blank { filter: Arc<str> },

    /// Serve a visibly marked placeholder tile.
    DebugPlaceholder { filter: Arc<str> },
}

impl FilterOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, FilterOutcome::Proceed)
    }

    /// Name of the filter that stopped the request, if any.
    pub fn filter_name(&self) -> Option<&str> {
        match self {
            FilterOutcome::Proceed => None,
            FilterOutcome::Blank { filter } | FilterOutcome::DebugPlaceholder { filter } => {
                Some(filter)
            }
        }
    }
}

// =============================================================================
// Update Operations
// =============================================================================

/// Reconfiguration operations a filter kind may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperation {
    /// Rebuild filter state for a range of zoom levels
    ZoomRange,

    /// Replace filter state for one zoom level with encoded data
    FilterData,

    /// Refresh filter state for a whole layer and grid set
    Layer,
}

impl fmt::Display for UpdateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateOperation::ZoomRange => "update zoom range",
            UpdateOperation::FilterData => "update with filter data",
            UpdateOperation::Layer => "update layer",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Tile Context
// =============================================================================

/// Everything a filter may look at for one tile request.
#[derive(Clone, Copy)]
pub struct TileContext<'a> {
    /// Name of the requested layer
    pub layer: &'a str,

    /// Requested tile
    pub index: TileIndex,

    /// Coverage of the layer's grid subset
    pub coverage: &'a dyn Coverage,

    /// Configured tile store, if any
    pub store: Option<&'a dyn TileStore>,
}

impl<'a> TileContext<'a> {
    pub fn new(
        layer: &'a str,
        index: TileIndex,
        coverage: &'a dyn Coverage,
        store: Option<&'a dyn TileStore>,
    ) -> Self {
        Self {
            layer,
            index,
            coverage,
            store,
        }
    }

    /// Existence capability of the configured store.
    ///
    /// `None` when no store is configured or the store cannot answer
    /// existence queries.
    pub fn existence(&self) -> Option<&'a dyn TileExistence> {
        self.store.and_then(|store| store.existence())
    }
}

// =============================================================================
// RequestFilter Trait
// =============================================================================

/// A filter run against each tile request before the tile is served.
#[async_trait]
pub trait RequestFilter: Send + Sync {
    /// Name of this filter instance.
    fn name(&self) -> &str;

    /// Decide what to do with the request.
    async fn apply(&self, ctx: &TileContext<'_>) -> FilterOutcome;

    /// Prepare the filter for a layer. Called once when the layer is built.
    fn initialize(&self, _layer: &TileLayer) -> Result<(), FilterError> {
        Ok(())
    }

    /// Update operations this filter kind supports.
    fn supported_updates(&self) -> &'static [UpdateOperation] {
        &[]
    }

    /// Whether `operation` is supported by this filter kind.
    fn supports(&self, operation: UpdateOperation) -> bool {
        self.supported_updates().contains(&operation)
    }

    /// Rebuild filter state for zoom levels `zoom_start..=zoom_stop`.
    fn update_zoom_range(
        &self,
        _layer: &TileLayer,
        _grid_set: &str,
        _zoom_start: u32,
        _zoom_stop: u32,
    ) -> Result<(), FilterError> {
        Err(FilterError::UnsupportedUpdate {
            filter: self.name().to_string(),
            operation: UpdateOperation::ZoomRange,
        })
    }

    /// Replace filter state for `zoom` with encoded data.
    fn update_with_data(
        &self,
        _data: &[u8],
        _layer: &TileLayer,
        _grid_set: &str,
        _zoom: u32,
    ) -> Result<(), FilterError> {
        Err(FilterError::UnsupportedUpdate {
            filter: self.name().to_string(),
            operation: UpdateOperation::FilterData,
        })
    }

    /// Refresh filter state for a layer. Returns whether anything changed.
    fn update_layer(&self, _layer: &TileLayer, _grid_set: &str) -> Result<bool, FilterError> {
        Err(FilterError::UnsupportedUpdate {
            filter: self.name().to_string(),
            operation: UpdateOperation::Layer,
        })
    }
}
