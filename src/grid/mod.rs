//! Tile addressing and layer coverage.
//!
//! This module provides the tile index type and the coverage check consumed by
//! request filters. It does not model coordinate reference systems: a grid
//! subset is just an inclusive rectangle of tiles per zoom level.

mod index;
mod subset;

pub use index::{TileIndex, TileKey};
pub use subset::{Coverage, GridSubset, ZoomExtent};
