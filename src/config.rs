//! Configuration management for Tile Gate.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TILE_GATE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use tile_gate::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `TILE_GATE_HOST` - Server bind address (default: 0.0.0.0)
//! - `TILE_GATE_PORT` - Server port (default: 3000)
//! - `TILE_GATE_LAYER` - Name of the served layer (default: default)
//! - `TILE_GATE_GRID` - Grid subset name (default: EPSG:3857)
//! - `TILE_GATE_MIN_ZOOM` / `TILE_GATE_MAX_ZOOM` - Covered zoom levels (default: 0-18)
//! - `TILE_GATE_TILE_SIZE` - Placeholder tile edge in pixels (default: 256)
//! - `TILE_GATE_STORE` - Tile store backend: memory, s3 or none (default: memory)
//! - `TILE_GATE_MEMORY_CAPACITY` - Memory store size in bytes (default: 256MB)
//! - `TILE_GATE_S3_BUCKET` - S3 bucket name (required for the s3 store)
//! - `TILE_GATE_S3_PREFIX` - Key prefix inside the bucket
//! - `TILE_GATE_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `TILE_GATE_S3_REGION` - AWS region (default: us-east-1)
//! - `TILE_GATE_EXISTING_FILTER` - Install the existing-tile filter (default: true)
//! - `TILE_GATE_ZOOM_START` / `TILE_GATE_ZOOM_STOP` - Filter zoom window
//! - `TILE_GATE_DEBUG_TILES` - Serve debug tiles instead of blank ones
//! - `TILE_GATE_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `TILE_GATE_CORS_ORIGINS` - Comma-separated allowed origins

use clap::{Parser, ValueEnum};

use crate::filter::FilterConfig;
use crate::storage::DEFAULT_MEMORY_STORE_CAPACITY;
use crate::tile::{DEFAULT_TILE_SIZE, MAX_TILE_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default layer name.
pub const DEFAULT_LAYER: &str = "default";

/// Default grid subset name.
pub const DEFAULT_GRID: &str = "EPSG:3857";

/// Default highest covered zoom level.
pub const DEFAULT_MAX_ZOOM: u32 = 18;

/// Highest zoom level a grid subset may cover.
pub const MAX_SUPPORTED_ZOOM: u32 = 30;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

/// Name given to the existing-tile filter.
pub const EXISTING_FILTER_NAME: &str = "existing-tile";

/// Tile store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// In-process LRU store, filled through PUT requests
    Memory,
    /// S3 or S3-compatible object storage
    S3,
    /// No store: tiles the filters let through cannot be served
    None,
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// Tile Gate - A map tile front end that skips tiles known to be empty.
///
/// Requests for tiles absent from the tile store are answered with a blank
/// (or debug) placeholder instead of reaching the store.
#[derive(Parser, Debug, Clone)]
#[command(name = "tile-gate")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TILE_GATE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TILE_GATE_PORT")]
    pub port: u16,

    // =========================================================================
    // Layer Configuration
    // =========================================================================
    /// Name of the served layer.
    #[arg(long, default_value = DEFAULT_LAYER, env = "TILE_GATE_LAYER")]
    pub layer: String,

    /// Name of the layer's grid subset.
    #[arg(long, default_value = DEFAULT_GRID, env = "TILE_GATE_GRID")]
    pub grid: String,

    /// Lowest zoom level covered by the grid subset.
    #[arg(long, default_value_t = 0, env = "TILE_GATE_MIN_ZOOM")]
    pub min_zoom: u32,

    /// Highest zoom level covered by the grid subset.
    #[arg(long, default_value_t = DEFAULT_MAX_ZOOM, env = "TILE_GATE_MAX_ZOOM")]
    pub max_zoom: u32,

    /// Edge length in pixels of the placeholder tiles.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "TILE_GATE_TILE_SIZE")]
    pub tile_size: u32,

    // =========================================================================
    // Store Configuration
    // =========================================================================
    /// Tile store backend.
    #[arg(long, value_enum, default_value_t = StoreKind::Memory, env = "TILE_GATE_STORE")]
    pub store: StoreKind,

    /// Maximum size of the memory store in bytes.
    #[arg(long, default_value_t = DEFAULT_MEMORY_STORE_CAPACITY, env = "TILE_GATE_MEMORY_CAPACITY")]
    pub memory_capacity: usize,

    /// S3 bucket holding the tiles.
    #[arg(long, env = "TILE_GATE_S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// Key prefix for tiles inside the bucket.
    #[arg(long, env = "TILE_GATE_S3_PREFIX")]
    pub s3_prefix: Option<String>,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    #[arg(long, env = "TILE_GATE_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "TILE_GATE_S3_REGION")]
    pub s3_region: String,

    // =========================================================================
    // Filter Configuration
    // =========================================================================
    /// Install the existing-tile filter on the layer.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "TILE_GATE_EXISTING_FILTER")]
    pub existing_filter: bool,

    /// Lowest zoom level the existing-tile filter checks (inclusive).
    #[arg(long, env = "TILE_GATE_ZOOM_START")]
    pub zoom_start: Option<u32>,

    /// Highest zoom level the existing-tile filter checks (inclusive).
    #[arg(long, env = "TILE_GATE_ZOOM_STOP")]
    pub zoom_stop: Option<u32>,

    /// Serve a visible debug tile instead of a blank one for missing tiles.
    #[arg(long, default_value_t = false, env = "TILE_GATE_DEBUG_TILES")]
    pub debug_tiles: bool,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// HTTP Cache-Control max-age in seconds for stored tiles.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "TILE_GATE_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TILE_GATE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.layer.is_empty() {
            return Err("layer name must not be empty".to_string());
        }

        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "min_zoom ({}) must not exceed max_zoom ({})",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(format!("max_zoom must be at most {}", MAX_SUPPORTED_ZOOM));
        }

        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(format!("tile_size must be between 1 and {}", MAX_TILE_SIZE));
        }

        match self.store {
            StoreKind::S3 if self.s3_bucket.as_deref().map_or(true, str::is_empty) => {
                return Err(
                    "S3 bucket name is required for the s3 store. \
                     Set --s3-bucket or TILE_GATE_S3_BUCKET"
                        .to_string(),
                );
            }
            StoreKind::Memory if self.memory_capacity == 0 => {
                return Err("memory_capacity must be greater than 0".to_string());
            }
            _ => {}
        }

        if self.existing_filter {
            self.filter_config()
                .validate()
                .map_err(|e| format!("existing-tile filter: {}", e))?;
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the existing-tile filter.
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::new()
            .with_zoom_start(self.zoom_start)
            .with_zoom_stop(self.zoom_stop)
            .with_debug(self.debug_tiles)
    }
}

// =============================================================================
// Tests
// =============================================================================
