//! Tile addressing.

use std::fmt;
use std::sync::Arc;

/// Address of a single tile within a layer's grid: column, row and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    /// Column (0-indexed from the left edge of the grid)
    pub column: u64,

    /// Row (0-indexed)
    pub row: u64,

    /// Zoom level
    pub zoom: u32,
}

impl TileIndex {
    /// Create a new tile index.
    pub fn new(column: u64, row: u64, zoom: u32) -> Self {
        Self { column, row, zoom }
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.column, self.row, self.zoom)
    }
}

/// Identifies a tile blob in a store: the layer it belongs to plus its index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Layer name
    pub layer: Arc<str>,

    /// Tile index within the layer
    pub index: TileIndex,
}

impl TileKey {
    /// Create a new tile key.
    pub fn new(layer: impl Into<Arc<str>>, index: TileIndex) -> Self {
        Self {
            layer: layer.into(),
            index,
        }
    }
}
