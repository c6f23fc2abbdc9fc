//! Tile stores.
//!
//! A [`TileStore`] holds encoded tile blobs. Stores that can answer "is this
//! tile already materialized?" without fetching it also expose the
//! [`TileExistence`] capability through [`TileStore::existence`].
//!
//! # Implementations
//!
//! - [`MemoryTileStore`]: LRU store with byte-size capacity
//! - [`S3TileStore`]: objects in an S3 bucket, existence via HEAD

mod memory;
mod s3;
mod store;

pub use memory::{MemoryTileStore, DEFAULT_MEMORY_STORE_CAPACITY};
pub use s3::{create_s3_client, S3TileStore};
pub use store::{TileExistence, TileStore};
