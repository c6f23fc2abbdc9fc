//! Existing-tile filter.
//!
//! Stops requests for tiles that lie inside a layer's grid subset but are not
//! already present in the tile store. Deployments use it when the store has
//! been pre-populated with every tile that holds data, so anything missing is
//! known to be empty and should not be generated or cached.
//!
//! Checks run in a fixed order:
//!
//! 1. Coverage. A tile outside the grid subset is always blank.
//! 2. Zoom window. Outside `zoomStart..=zoomStop` the filter steps aside.
//! 3. Existence. A stored tile proceeds; a missing one is blank, or a debug
//!    placeholder when `debug` is set.
//!
//! A failing existence lookup counts as "missing". Storage trouble suppresses
//! the tile instead of failing the request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::FilterError;
use crate::grid::{Coverage, TileIndex, TileKey};
use crate::storage::TileExistence;

use super::config::FilterConfig;
use super::request::{FilterOutcome, RequestFilter, TileContext};

/// Filter that blanks tiles not already materialized in the tile store.
///
/// # Example
///
/// ```
/// use tile_gate::filter::{ExistingTileFilter, FilterConfig, FilterOutcome};
/// use tile_gate::grid::{GridSubset, TileIndex};
///
/// #[tokio::main]
/// async fn main() {
///     let config = FilterConfig::new().with_zoom_start(5).with_zoom_stop(10);
///     let filter = ExistingTileFilter::new("existing", config).unwrap();
///     let grid = GridSubset::full_pyramid("EPSG:3857", 0, 12);
///
///     // Below the zoom window the filter steps aside.
///     let outcome = filter
///         .evaluate("roads", &TileIndex::new(0, 0, 3), &grid, None)
///         .await;
///     assert_eq!(outcome, FilterOutcome::Proceed);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ExistingTileFilter {
    name: Arc<str>,
    config: FilterConfig,
}

impl ExistingTileFilter {
    /// Create a filter, rejecting an inverted zoom window.
    pub fn new(name: impl Into<Arc<str>>, config: FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Decide what to do with a request for `index` in `layer`.
    ///
    /// `existence` is the store's existence capability; `None` means the
    /// deployment has no way to check, and every tile counts as missing.
    pub async fn evaluate(
        &self,
        layer: &str,
        index: &TileIndex,
        coverage: &dyn Coverage,
        existence: Option<&dyn TileExistence>,
    ) -> FilterOutcome {
        if let Err(e) = coverage.check_coverage(index) {
            debug!(filter = %self.name, layer, "{}", e);
            return self.blank();
        }

        if !self.config.applies_at(index.zoom) {
            return FilterOutcome::Proceed;
        }

        if self.tile_exists(layer, index, existence).await {
            return FilterOutcome::Proceed;
        }

        info!(
            filter = %self.name,
            layer,
            column = index.column,
            row = index.row,
            zoom = index.zoom,
            "Tile {} does not exist.",
            index
        );

        if self.config.is_debug() {
            FilterOutcome::DebugPlaceholder {
                filter: Arc::clone(&self.name),
            }
        } else {
            self.blank()
        }
    }

    async fn tile_exists(
        &self,
        layer: &str,
        index: &TileIndex,
        existence: Option<&dyn TileExistence>,
    ) -> bool {
        let Some(existence) = existence else {
            debug!(filter = %self.name, layer, "Tile store cannot check existence");
            return false;
        };

        match existence.tile_exists(&TileKey::new(layer, *index)).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(
                    filter = %self.name,
                    layer,
                    tile = %index,
                    "Existence check failed, treating tile as missing: {}",
                    e
                );
                false
            }
        }
    }

    fn blank(&self) -> FilterOutcome {
        FilterOutcome::Blank {
            filter: Arc::clone(&self.name),
        }
    }
}

#[async_trait]
impl RequestFilter for ExistingTileFilter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, ctx: &TileContext<'_>) -> FilterOutcome {
        self.evaluate(ctx.layer, &ctx.index, ctx.coverage, ctx.existence())
            .await
    }
}
