//! Placeholder tiles.
//!
//! Requests stopped by a filter are answered with one of two pre-rendered
//! PNGs: a fully transparent blank tile, or a translucent green debug tile
//! that makes filter decisions visible on the map.
//!
//! Both are rendered once at startup and shared as [`Bytes`].

use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::error::TileError;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Largest accepted tile edge length in pixels.
pub const MAX_TILE_SIZE: u32 = 4096;

/// RGBA color of blank tiles.
pub const BLANK_COLOR: [u8; 4] = [0, 0, 0, 0];

/// RGBA color of debug tiles.
pub const DEBUG_COLOR: [u8; 4] = [0, 200, 0, 128];

/// Pre-rendered blank and debug tiles.
#[derive(Debug, Clone)]
pub struct PlaceholderTiles {
    tile_size: u32,
    blank: Bytes,
    debug: Bytes,
}

impl PlaceholderTiles {
    /// Render both placeholders at `tile_size` x `tile_size` pixels.
    pub fn new(tile_size: u32) -> Result<Self, TileError> {
        Ok(Self {
            tile_size,
            blank: render_solid_png(tile_size, BLANK_COLOR)?,
            debug: render_solid_png(tile_size, DEBUG_COLOR)?,
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// The blank tile.
    pub fn blank(&self) -> Bytes {
        self.blank.clone()
    }

    /// The debug tile.
    pub fn debug(&self) -> Bytes {
        self.debug.clone()
    }
}

/// Encode a square single-color RGBA image as PNG.
pub fn render_solid_png(size: u32, color: [u8; 4]) -> Result<Bytes, TileError> {
    if size == 0 || size > MAX_TILE_SIZE {
        return Err(TileError::EncodeError {
            message: format!("tile size must be between 1 and {}, got {}", MAX_TILE_SIZE, size),
        });
    }

    let image = RgbaImage::from_pixel(size, size, Rgba(color));

    let mut output = Vec::new();
    PngEncoder::new(&mut output)
        .write_image(image.as_raw(), size, size, ExtendedColorType::Rgba8)
        .map_err(|e| TileError::EncodeError {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(output))
}
