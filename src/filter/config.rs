//! Settings for the existing-tile filter.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Zoom window and debug switch for an [`ExistingTileFilter`].
///
/// All fields are optional. A missing bound leaves that side of the zoom
/// window open; a missing `debug` is treated as `false`. Serialized field
/// names are `zoomStart`, `zoomStop` and `debug`.
///
/// The value is built once when configuration is loaded and then shared
/// read-only between requests.
///
/// [`ExistingTileFilter`]: super::ExistingTileFilter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zoom_start: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    zoom_stop: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    debug: Option<bool>,
}

impl FilterConfig {
    /// Create a configuration with no zoom bounds and debug off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lowest zoom level (inclusive) the filter applies to.
    pub fn with_zoom_start(mut self, zoom_start: impl Into<Option<u32>>) -> Self {
        self.zoom_start = zoom_start.into();
        self
    }

    /// Set the highest zoom level (inclusive) the filter applies to.
    pub fn with_zoom_stop(mut self, zoom_stop: impl Into<Option<u32>>) -> Self {
        self.zoom_stop = zoom_stop.into();
        self
    }

    /// Set whether missing tiles produce a debug placeholder.
    pub fn with_debug(mut self, debug: impl Into<Option<bool>>) -> Self {
        self.debug = debug.into();
        self
    }

    pub fn zoom_start(&self) -> Option<u32> {
        self.zoom_start
    }

    pub fn zoom_stop(&self) -> Option<u32> {
        self.zoom_stop
    }

    pub fn debug(&self) -> Option<bool> {
        self.debug
    }

    /// Whether missing tiles should be flagged visibly.
    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Whether the filter has anything to say at `zoom`.
    pub fn applies_at(&self, zoom: u32) -> bool {
        let below = self.zoom_start.is_some_and(|start| zoom < start);
        let above = self.zoom_stop.is_some_and(|stop| zoom > stop);
        !(below || above)
    }

    /// Reject an inverted zoom window.
    pub fn validate(&self) -> Result<(), FilterError> {
        match (self.zoom_start, self.zoom_stop) {
            (Some(zoom_start), Some(zoom_stop)) if zoom_start > zoom_stop => {
                Err(FilterError::InvalidZoomRange {
                    zoom_start,
                    zoom_stop,
                })
            }
            _ => Ok(()),
        }
    }
}
