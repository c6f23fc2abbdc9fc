use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;
use crate::grid::TileKey;

/// Trait for stores holding encoded tile blobs.
///
/// Implementations must be thread-safe; the tile service shares one store
/// across all request handlers.
#[async_trait]
pub trait TileStore: Send + Sync {
    /// Fetch the blob for `key`, or `None` if the store holds nothing for it.
    async fn get_tile(&self, key: &TileKey) -> Result<Option<Bytes>, StorageError>;

    /// Store (or replace) the blob for `key`.
    async fn put_tile(&self, key: TileKey, data: Bytes) -> Result<(), StorageError>;

    /// Get a human-readable identifier for this store (for logging).
    fn identifier(&self) -> &str;

    /// Existence-check capability, if the store can answer existence queries.
    ///
    /// Stores that cannot tell whether a tile exists without fetching it
    /// return `None`; callers then treat existence as unknown.
    fn existence(&self) -> Option<&dyn TileExistence> {
        None
    }
}

/// Capability to answer whether a tile blob is already materialized.
#[async_trait]
pub trait TileExistence: Send + Sync {
    /// Return `true` if a blob is stored for `key`.
    ///
    /// The call may block on remote I/O and may run concurrently from many
    /// request handlers.
    async fn tile_exists(&self, key: &TileKey) -> Result<bool, StorageError>;
}
