//! Grid subsets and the coverage check.
//!
//! A grid subset is the set of tiles a layer is defined for. It is stored as
//! one inclusive rectangle of columns and rows per zoom level.

use std::collections::BTreeMap;

use crate::error::CoverageError;

use super::index::TileIndex;

// =============================================================================
// Coverage Trait
// =============================================================================

/// Reports whether a tile index lies inside a layer's declared coverage.
pub trait Coverage: Send + Sync {
    /// Return `Ok(())` if the index is covered, or the reason it is not.
    fn check_coverage(&self, index: &TileIndex) -> Result<(), CoverageError>;
}

// =============================================================================
// Zoom Extent
// =============================================================================

/// Inclusive tile rectangle for a single zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomExtent {
    pub zoom: u32,
    pub min_column: u64,
    pub min_row: u64,
    pub max_column: u64,
    pub max_row: u64,
}

impl ZoomExtent {
    /// Create a new extent.
    pub fn new(zoom: u32, min_column: u64, min_row: u64, max_column: u64, max_row: u64) -> Self {
        Self {
            zoom,
            min_column,
            min_row,
            max_column,
            max_row,
        }
    }

    /// The complete 2^zoom x 2^zoom square at this zoom level.
    pub fn full(zoom: u32) -> Self {
        let max = max_index(zoom);
        Self::new(zoom, 0, 0, max, max)
    }

    /// Whether the column and row of `index` fall inside this extent.
    pub fn contains(&self, index: &TileIndex) -> bool {
        (self.min_column..=self.max_column).contains(&index.column)
            && (self.min_row..=self.max_row).contains(&index.row)
    }
}

/// Largest column/row index at `zoom` in a quadtree pyramid.
fn max_index(zoom: u32) -> u64 {
    if zoom == 0 {
        0
    } else {
        u64::MAX >> (64 - zoom.min(64))
    }
}

// =============================================================================
// Grid Subset
// =============================================================================

/// The set of tiles a layer is defined for.
#[derive(Debug, Clone)]
pub struct GridSubset {
    name: String,
    extents: BTreeMap<u32, ZoomExtent>,
}

impl GridSubset {
    /// Create a grid subset from explicit per-zoom extents.
    ///
    /// If two extents share a zoom level, the later one wins.
    pub fn new(name: impl Into<String>, extents: impl IntoIterator<Item = ZoomExtent>) -> Self {
        Self {
            name: name.into(),
            extents: extents.into_iter().map(|e| (e.zoom, e)).collect(),
        }
    }

    /// Create a grid subset covering the whole quadtree pyramid between
    /// `min_zoom` and `max_zoom` (inclusive).
    pub fn full_pyramid(name: impl Into<String>, min_zoom: u32, max_zoom: u32) -> Self {
        Self::new(name, (min_zoom..=max_zoom).map(ZoomExtent::full))
    }

    /// Name of the grid subset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extent at the given zoom level, if covered.
    pub fn extent(&self, zoom: u32) -> Option<&ZoomExtent> {
        self.extents.get(&zoom)
    }

    /// Lowest and highest covered zoom levels.
    pub fn zoom_range(&self) -> Option<(u32, u32)> {
        let min = *self.extents.keys().next()?;
        let max = *self.extents.keys().next_back()?;
        Some((min, max))
    }
}

impl Coverage for GridSubset {
    fn check_coverage(&self, index: &TileIndex) -> Result<(), CoverageError> {
        let extent = self
            .extents
            .get(&index.zoom)
            .ok_or_else(|| CoverageError::ZoomNotCovered {
                grid: self.name.clone(),
                zoom: index.zoom,
            })?;

        if extent.contains(index) {
            Ok(())
        } else {
            Err(CoverageError::OutsideCoverage {
                grid: self.name.clone(),
                column: index.column,
                row: index.row,
                zoom: index.zoom,
            })
        }
    }
}
