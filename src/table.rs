//! Fixed-size bucket table
//!
//! The table owns exactly [`LENGTH`] bucket slots, one per possible hash key.
//! An entry lands in the slot named by the NIC octets of its address and is
//! inserted into that slot's search tree. The array never grows, shrinks or
//! rehashes.
//!
//! A bitmap tracks which slots are non-empty so that clearing, iterating and
//! gathering statistics touch only occupied buckets.

use std::fmt;

use bitvec::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::address::MacAddress;
use crate::codec::{self, HashKey};
use crate::config::TableConfig;
use crate::entry::{BridgeEntry, INVALID_INTERFACE};
use crate::error::{Error, Result};
use crate::tree::{self, Link};

/// Number of buckets: one per 24-bit hash key
pub const LENGTH: usize = 1 << codec::HASH_KEY_BITS;

/// Occupancy summary of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct TableStats {
    /// Total number of entries
    pub entries: usize,
    /// Buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Buckets holding more than one entry
    pub collided_buckets: usize,
    /// Deepest bucket tree
    pub max_depth: usize,
}

impl TableStats {
    fn of_bucket(root: &Link) -> Self {
        let entries = tree::len(root);
        Self {
            entries,
            occupied_buckets: usize::from(entries > 0),
            collided_buckets: usize::from(entries > 1),
            max_depth: tree::depth(root),
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            entries: self.entries + other.entries,
            occupied_buckets: self.occupied_buckets + other.occupied_buckets,
            collided_buckets: self.collided_buckets + other.collided_buckets,
            max_depth: self.max_depth.max(other.max_depth),
        }
    }
}

/// Backing storage of an initialized table
struct Storage {
    buckets: Box<[Link]>,
    occupied: BitVec<usize, Lsb0>,
    len: usize,
}

impl Storage {
    fn allocate() -> Self {
        debug!(buckets = LENGTH, "Allocating bridge table");
        Self {
            // Zeroed allocation; untouched empty slots cost no resident memory
            buckets: vec![None; LENGTH].into_boxed_slice(),
            occupied: BitVec::repeat(false, LENGTH),
            len: 0,
        }
    }

    /// Empty every occupied bucket, returning the number of entries dropped
    fn clear(&mut self) -> usize {
        for index in self.occupied.iter_ones() {
            self.buckets[index] = None;
        }
        self.occupied.fill(false);
        std::mem::take(&mut self.len)
    }
}

/// Whether an insertion at `depth` is the first in its bucket to pass `threshold`
///
/// Depth grows one level at a time, so this holds at most once per bucket.
fn crosses_threshold(depth: usize, threshold: usize) -> bool {
    depth == threshold.saturating_add(1)
}

/// Validate a hash key as a bucket index
fn bucket_index(hash: HashKey) -> Result<usize> {
    checked_index(hash as usize)
}

fn checked_index(index: usize) -> Result<usize> {
    if index < LENGTH {
        Ok(index)
    } else {
        Err(Error::OutOfBounds {
            index,
            length: LENGTH,
        })
    }
}

/// MAC address forwarding table
pub struct BridgeTable {
    storage: Option<Storage>,
    config: TableConfig,
}

impl BridgeTable {
    /// Create a table with all buckets allocated and empty
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create a table with the given configuration
    pub fn with_config(config: TableConfig) -> Self {
        let storage = config.allocate_on_create.then(Storage::allocate);
        Self { storage, config }
    }

    /// The table's configuration
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Whether the bucket array has been allocated
    pub fn is_initialized(&self) -> bool {
        self.storage.is_some()
    }

    /// Number of buckets
    pub const fn capacity(&self) -> usize {
        LENGTH
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.storage.as_ref().map_or(0, |storage| storage.len)
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every bucket, allocating the bucket array if needed
    pub fn initialize(&mut self) {
        match self.storage.as_mut() {
            Some(storage) => {
                let cleared = storage.clear();
                debug!(cleared, "Initialized bridge table");
            }
            None => self.storage = Some(Storage::allocate()),
        }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage.as_ref().ok_or(Error::Uninitialized)
    }

    /// Add an entry
    ///
    /// Fails with [`Error::DuplicateKey`] if the address is already present.
    /// The table is unchanged by any failed call.
    pub fn add(&mut self, entry: BridgeEntry) -> Result<()> {
        let threshold = self.config.depth_warning_threshold;
        let storage = self.storage.as_mut().ok_or(Error::Uninitialized)?;
        let index = bucket_index(codec::hash_key(entry.address()))?;

        let depth = match tree::insert(&mut storage.buckets[index], entry) {
            Ok(depth) => depth,
            Err(err) => {
                debug!(address = %entry.address(), bucket = index, "Rejected duplicate address");
                return Err(err);
            }
        };

        storage.occupied.set(index, true);
        storage.len += 1;
        trace!(
            address = %entry.address(),
            interface = entry.interface(),
            bucket = index,
            depth,
            "Added entry"
        );

        if crosses_threshold(depth, threshold) {
            warn!(
                bucket = index,
                depth, threshold, "Bucket tree depth exceeds warning threshold"
            );
        }
        Ok(())
    }

    /// Find the entry for an address
    pub fn find(&self, address: &MacAddress) -> Result<Option<&BridgeEntry>> {
        let storage = self.storage()?;
        let index = bucket_index(codec::hash_key(address))?;
        Ok(tree::find(&storage.buckets[index], codec::order_key(address)))
    }

    /// Find the interface for an address, or [`INVALID_INTERFACE`]
    pub fn find_interface(&self, address: &MacAddress) -> Result<i32> {
        Ok(self
            .find(address)?
            .map_or(INVALID_INTERFACE, BridgeEntry::interface))
    }

    /// Whether an address is present
    pub fn contains(&self, address: &MacAddress) -> Result<bool> {
        Ok(self.find(address)?.is_some())
    }

    /// Root of the tree in bucket `index`
    pub fn bucket(&self, index: usize) -> Result<&Link> {
        let storage = self.storage()?;
        let index = checked_index(index)?;
        Ok(&storage.buckets[index])
    }

    /// Depth of the tree in bucket `index`
    pub fn bucket_depth(&self, index: usize) -> Result<usize> {
        self.bucket(index).map(tree::depth)
    }

    /// Iterate entries by bucket, then by address within a bucket
    pub fn iter(&self) -> impl Iterator<Item = &BridgeEntry> + '_ {
        self.storage.iter().flat_map(|storage| {
            storage
                .occupied
                .iter_ones()
                .flat_map(move |index| tree::iter(&storage.buckets[index]))
        })
    }

    /// Summarize bucket occupancy and tree depth
    pub fn stats(&self) -> Result<TableStats> {
        let storage = self.storage()?;

        #[cfg(feature = "parallel")]
        let stats = storage
            .occupied
            .iter_ones()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|index| TableStats::of_bucket(&storage.buckets[index]))
            .reduce(TableStats::default, TableStats::merge);

        #[cfg(not(feature = "parallel"))]
        let stats = storage
            .occupied
            .iter_ones()
            .map(|index| TableStats::of_bucket(&storage.buckets[index]))
            .fold(TableStats::default(), TableStats::merge);

        Ok(stats)
    }
}

impl Default for BridgeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BridgeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeTable")
            .field("initialized", &self.is_initialized())
            .field("len", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
