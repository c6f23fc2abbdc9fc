//! Request filters.
//!
//! Filters run after a request has been resolved to a layer and tile index,
//! and before the tile service touches the store. Each filter returns a
//! [`FilterOutcome`]: proceed with normal handling, or stop and serve a blank
//! or debug placeholder tile.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! └────────────────────┬────────────────────┘
//!                      │ TileContext
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │         RequestFilter (per layer)       │
//! │  ┌───────────────────────────────────┐  │
//! │  │        ExistingTileFilter         │  │
//! │  │ coverage → zoom window → exists?  │  │
//! │  └───────────────────────────────────┘  │
//! └──────────┬───────────────────┬──────────┘
//!            ▼                   ▼
//!     ┌────────────┐      ┌──────────────┐
//!     │ GridSubset │      │ TileExistence│
//!     └────────────┘      └──────────────┘
//! ```

mod config;
mod existing;
mod request;

pub use config::FilterConfig;
pub use existing::ExistingTileFilter;
pub use request::{FilterOutcome, RequestFilter, TileContext, UpdateOperation};
