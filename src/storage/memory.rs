//! In-memory tile store.
//!
//! This module provides an LRU store for encoded tiles, useful for development
//! and for layers whose pre-rendered tiles fit in memory.
//!
//! # Size-Based Eviction
//!
//! The store tracks the total size of stored tiles in bytes and evicts
//! least-recently-used entries when the capacity is exceeded.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::grid::TileKey;

use super::store::{TileExistence, TileStore};

/// Default store capacity: 256MB
pub const DEFAULT_MEMORY_STORE_CAPACITY: usize = 256 * 1024 * 1024;

/// Default maximum number of entries (to bound LRU overhead)
const DEFAULT_MAX_ENTRIES: usize = 100_000;

const MEMORY_STORE_IDENTIFIER: &str = "memory://";

/// LRU tile store with size-based capacity.
///
/// # Example
///
/// ```
/// use tile_gate::grid::{TileIndex, TileKey};
/// use tile_gate::storage::{MemoryTileStore, TileStore};
/// use bytes::Bytes;
///
/// #[tokio::main]
/// async fn main() {
///     let store = MemoryTileStore::new();
///     let key = TileKey::new("roads", TileIndex::new(1, 2, 3));
///
///     store.put_tile(key.clone(), Bytes::from_static(b"png")).await.unwrap();
///
///     let exists = store.existence().unwrap().tile_exists(&key).await.unwrap();
///     assert!(exists);
/// }
/// ```
pub struct MemoryTileStore {
    /// The underlying LRU cache
    tiles: RwLock<LruCache<TileKey, Bytes>>,

    /// Maximum total size in bytes
    max_size: usize,

    /// Current total size in bytes
    current_size: RwLock<usize>,
}

impl MemoryTileStore {
    /// Create a new store with default capacity (256MB).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_STORE_CAPACITY)
    }

    /// Create a new store with the specified capacity in bytes.
    pub fn with_capacity(max_size: usize) -> Self {
        Self::with_capacity_and_entries(max_size, DEFAULT_MAX_ENTRIES)
    }

    /// Create a new store with specified capacity and maximum entries.
    ///
    /// A `max_entries` of zero is treated as one.
    pub fn with_capacity_and_entries(max_size: usize, max_entries: usize) -> Self {
        Self {
            tiles: RwLock::new(LruCache::new(
                NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN),
            )),
            max_size,
            current_size: RwLock::new(0),
        }
    }

    /// Get the current number of stored tiles.
    pub async fn len(&self) -> usize {
        self.tiles.read().await.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.tiles.read().await.is_empty()
    }

    /// Get the current total size of stored tiles in bytes.
    pub async fn size(&self) -> usize {
        *self.current_size.read().await
    }

    /// Get the maximum capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for MemoryTileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TileStore for MemoryTileStore {
    async fn get_tile(&self, key: &TileKey) -> Result<Option<Bytes>, StorageError> {
        let mut tiles = self.tiles.write().await;
        Ok(tiles.get(key).cloned())
    }

    async fn put_tile(&self, key: TileKey, data: Bytes) -> Result<(), StorageError> {
        let data_size = data.len();
        let mut tiles = self.tiles.write().await;
        let mut current_size = self.current_size.write().await;

        if let Some(old) = tiles.peek(&key) {
            *current_size = current_size.saturating_sub(old.len());
        }

        // Entry-count eviction happens inside `push`; account for it.
        if let Some((evicted_key, evicted)) = tiles.push(key.clone(), data) {
            if evicted_key != key {
                *current_size = current_size.saturating_sub(evicted.len());
            }
        }
        *current_size += data_size;

        while *current_size > self.max_size {
            match tiles.pop_lru() {
                Some((_, evicted)) => {
                    *current_size = current_size.saturating_sub(evicted.len());
                }
                None => break,
            }
        }

        Ok(())
    }

    fn identifier(&self) -> &str {
        MEMORY_STORE_IDENTIFIER
    }

    fn existence(&self) -> Option<&dyn TileExistence> {
        Some(self)
    }
}

#[async_trait]
impl TileExistence for MemoryTileStore {
    async fn tile_exists(&self, key: &TileKey) -> Result<bool, StorageError> {
        // `contains` does not touch LRU order, so existence probes do not
        // keep tiles alive.
        Ok(self.tiles.read().await.contains(key))
    }
}
