use thiserror::Error;

use crate::filter::UpdateOperation;

/// Errors raised by tile stores
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store cannot serve requests right now
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Coverage violations reported by a grid subset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    /// The grid subset defines no extent at this zoom level
    #[error("Zoom level {zoom} is not covered by grid subset '{grid}'")]
    ZoomNotCovered { grid: String, zoom: u32 },

    /// Column or row falls outside the extent of the zoom level
    #[error("Tile [{column},{row},{zoom}] is outside the coverage of grid subset '{grid}'")]
    OutsideCoverage {
        grid: String,
        column: u64,
        row: u64,
        zoom: u32,
    },
}

/// Errors related to request filter configuration and reconfiguration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The filter kind does not support the requested update operation
    #[error("Operation '{operation}' is not supported by filter '{filter}'")]
    UnsupportedUpdate {
        filter: String,
        operation: UpdateOperation,
    },

    /// The configured zoom window is inverted
    #[error("Invalid zoom range: zoomStart ({zoom_start}) is greater than zoomStop ({zoom_stop})")]
    InvalidZoomRange { zoom_start: u32, zoom_stop: u32 },
}

/// Errors that can occur while serving or seeding a tile
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// No layer with this name is configured
    #[error("Layer not found: {layer}")]
    LayerNotFound { layer: String },

    /// Path parameters could not be parsed into a tile index
    #[error("Invalid tile coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// The tile lies outside the layer's grid subset
    #[error("{0}")]
    OutsideCoverage(#[from] CoverageError),

    /// The tile passed every filter but the store holds no data for it
    #[error("Tile [{column},{row},{zoom}] not found in layer '{layer}'")]
    TileNotFound {
        layer: String,
        column: u64,
        row: u64,
        zoom: u32,
    },

    /// A write was requested but no store is configured
    #[error("No tile store is configured")]
    StoreNotConfigured,

    /// Error from the tile store
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Placeholder tile rendering failed
    #[error("Failed to encode tile: {message}")]
    EncodeError { message: String },
}
