//! Bridge Table: MAC address forwarding table
//!
//! This crate maps 48-bit hardware addresses to bridge interface identifiers.
//! A fixed array of 2^24 buckets is indexed directly by the address's NIC
//! octets, and addresses that collide on those octets are kept in an
//! unbalanced binary search tree ordered by the full address.

#![warn(missing_docs)]

/// Hardware address type
pub mod address;

/// Hash and order key derivation
pub mod codec;

/// Address to interface entries
pub mod entry;

/// Per-bucket search trees
pub mod tree;

/// Fixed-size bucket table
pub mod table;

/// Lock-protected table for concurrent use
pub mod shared;

/// Property tests against a reference map
#[cfg(test)]
mod property_tests;

// Re-exports
pub use address::{AddressError, MacAddress};
pub use config::TableConfig;
pub use entry::{BridgeEntry, INVALID_INTERFACE};
pub use error::{Error, Result};
pub use shared::SharedBridgeTable;
pub use table::{BridgeTable, LENGTH, TableStats};

/// Error types for table operations
pub mod error {
    use std::error::Error as StdError;
    use std::fmt;

    use crate::address::MacAddress;

    /// Error types that can occur in table operations
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        /// The table has no backing storage
        Uninitialized,
        /// A bucket index fell outside the bucket array
        OutOfBounds {
            /// Offending index
            index: usize,
            /// Number of buckets
            length: usize,
        },
        /// The address is already in the table
        DuplicateKey(MacAddress),
    }

    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Error::Uninitialized => write!(f, "Uninitialized hash table"),
                Error::OutOfBounds { index, length } => {
                    write!(f, "Index {} is out of bounds for {} buckets", index, length)
                }
                Error::DuplicateKey(address) => {
                    write!(f, "MAC addresses must be unique: {} is already present", address)
                }
            }
        }
    }

    impl StdError for Error {}

    /// Result type for table operations
    pub type Result<T> = std::result::Result<T, Error>;
}

/// Configuration options for a bridge table
pub mod config {
    /// Configuration for a [`BridgeTable`](crate::BridgeTable)
    #[derive(Debug, Clone)]
    pub struct TableConfig {
        /// Allocate the bucket array at construction. When false the table
        /// starts uninitialized and `initialize` allocates it.
        pub allocate_on_create: bool,
        /// Tree depth beyond which an insertion is logged as a warning
        pub depth_warning_threshold: usize,
    }

    impl Default for TableConfig {
        fn default() -> Self {
            Self {
                allocate_on_create: true,
                depth_warning_threshold: 32,
            }
        }
    }
}
