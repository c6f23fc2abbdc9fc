//! Tile service layer.
//!
//! This module resolves tile requests for the HTTP layer: it owns the
//! configured layers, runs their request filters, and picks the bytes to
//! return.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TileLayer   │  │  Placeholder    │  │
//! │  │  (filters)   │  │  Tiles (PNG)    │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               TileStore                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileService`]: Main entry point for tile requests
//! - [`TileLayer`]: Layer name, grid subset and filter chain
//! - [`PlaceholderTiles`]: Pre-rendered blank and debug PNGs
//! - [`TileRequest`]: Parameters for a tile request
//! - [`TileResponse`]: Response containing tile data and its source

mod layer;
mod placeholder;
mod service;

pub use layer::TileLayer;
pub use placeholder::{
    render_solid_png, PlaceholderTiles, BLANK_COLOR, DEBUG_COLOR, DEFAULT_TILE_SIZE,
    MAX_TILE_SIZE,
};
pub use service::{TileRequest, TileResponse, TileService, TileSource};
