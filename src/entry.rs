//! Forwarding table entries

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::address::{AddressError, MacAddress};

/// Interface value meaning "no interface assigned" or "not found"
pub const INVALID_INTERFACE: i32 = -1;

/// A MAC address and the bridge interface it was learned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct BridgeEntry {
    address: MacAddress,
    interface: i32,
}

impl BridgeEntry {
    /// Create a new entry
    pub fn new(address: MacAddress, interface: i32) -> Self {
        Self { address, interface }
    }

    /// Create an entry from raw address bytes
    ///
    /// Only the length is checked. Whether the bytes form a meaningful
    /// hardware address is up to the caller.
    pub fn from_slice(address: &[u8], interface: i32) -> Result<Self, AddressError> {
        Ok(Self::new(MacAddress::try_from(address)?, interface))
    }

    /// The entry's address
    pub fn address(&self) -> &MacAddress {
        &self.address
    }

    /// The interface identifier, possibly [`INVALID_INTERFACE`]
    pub fn interface(&self) -> i32 {
        self.interface
    }

    /// Whether an interface has been assigned
    pub fn has_interface(&self) -> bool {
        self.interface != INVALID_INTERFACE
    }
}

impl Default for BridgeEntry {
    fn default() -> Self {
        Self {
            address: MacAddress::ZERO,
            interface: INVALID_INTERFACE,
        }
    }
}
