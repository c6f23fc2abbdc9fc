//! Tile layers and their filter chains.

use std::sync::Arc;

use crate::error::FilterError;
use crate::filter::{FilterOutcome, RequestFilter, TileContext};
use crate::grid::{GridSubset, TileIndex};
use crate::storage::TileStore;

/// A named layer: its grid subset plus the request filters run for it.
pub struct TileLayer {
    name: Arc<str>,
    grid_subset: GridSubset,
    filters: Vec<Arc<dyn RequestFilter>>,
}

impl TileLayer {
    /// Create a layer with no filters.
    pub fn new(name: impl Into<Arc<str>>, grid_subset: GridSubset) -> Self {
        Self {
            name: name.into(),
            grid_subset,
            filters: Vec::new(),
        }
    }

    /// Append a filter to the chain, initializing it for this layer.
    pub fn with_filter(mut self, filter: Arc<dyn RequestFilter>) -> Result<Self, FilterError> {
        filter.initialize(&self)?;
        self.filters.push(filter);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid_subset(&self) -> &GridSubset {
        &self.grid_subset
    }

    pub fn filters(&self) -> &[Arc<dyn RequestFilter>] {
        &self.filters
    }

    /// Run the filter chain in order. The first outcome that is not
    /// `Proceed` ends the chain.
    pub async fn apply_filters(
        &self,
        index: TileIndex,
        store: Option<&dyn TileStore>,
    ) -> FilterOutcome {
        let ctx = TileContext::new(&self.name, index, &self.grid_subset, store);

        for filter in &self.filters {
            let outcome = filter.apply(&ctx).await;
            if !outcome.is_proceed() {
                return outcome;
            }
        }

        FilterOutcome::Proceed
    }
}
