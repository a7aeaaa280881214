//! Shared bridge table
//!
//! [`BridgeTable`] is single-threaded. This wrapper guards a whole table with
//! one reader-writer lock: lookups share the lock, while `add` and
//! `initialize` hold it exclusively. Lookups return copies because the lock
//! is released before the call returns.

use parking_lot::RwLock;

use crate::address::MacAddress;
use crate::config::TableConfig;
use crate::entry::BridgeEntry;
use crate::error::Result;
use crate::table::{BridgeTable, TableStats};

/// A bridge table that can be shared between threads
#[derive(Debug, Default)]
pub struct SharedBridgeTable {
    inner: RwLock<BridgeTable>,
}

impl SharedBridgeTable {
    /// Create a shared table with all buckets allocated
    pub fn new() -> Self {
        Self::from_table(BridgeTable::new())
    }

    /// Create a shared table with the given configuration
    pub fn with_config(config: TableConfig) -> Self {
        Self::from_table(BridgeTable::with_config(config))
    }

    /// Wrap an existing table
    pub fn from_table(table: BridgeTable) -> Self {
        Self {
            inner: RwLock::new(table),
        }
    }

    /// Unwrap the table
    pub fn into_inner(self) -> BridgeTable {
        self.inner.into_inner()
    }

    /// See [`BridgeTable::initialize`]
    pub fn initialize(&self) {
        self.inner.write().initialize();
    }

    /// See [`BridgeTable::add`]
    pub fn add(&self, entry: BridgeEntry) -> Result<()> {
        self.inner.write().add(entry)
    }

    /// See [`BridgeTable::find`]
    pub fn find(&self, address: &MacAddress) -> Result<Option<BridgeEntry>> {
        Ok(self.inner.read().find(address)?.copied())
    }

    /// See [`BridgeTable::find_interface`]
    pub fn find_interface(&self, address: &MacAddress) -> Result<i32> {
        self.inner.read().find_interface(address)
    }

    /// See [`BridgeTable::contains`]
    pub fn contains(&self, address: &MacAddress) -> Result<bool> {
        self.inner.read().contains(address)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`BridgeTable::stats`]
    pub fn stats(&self) -> Result<TableStats> {
        self.inner.read().stats()
    }
}
