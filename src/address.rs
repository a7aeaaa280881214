//! Hardware address type
//!
//! A MAC address is six octets. The first three carry the vendor-assigned
//! OUI, the last three identify the device (NIC) within that vendor.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Number of octets in a MAC address
pub const ADDRESS_LEN: usize = 6;

/// Error types for address construction and parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Input did not contain exactly six bytes
    InvalidLength(usize),
    /// Text was not six hex pairs separated by ':' or '-'
    InvalidFormat(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::InvalidLength(len) => {
                write!(f, "MAC address must be {} bytes, got {}", ADDRESS_LEN, len)
            }
            AddressError::InvalidFormat(text) => write!(f, "Invalid MAC address: {:?}", text),
        }
    }
}

impl std::error::Error for AddressError {}

/// A 48-bit hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct MacAddress([u8; ADDRESS_LEN]);

impl MacAddress {
    /// The all-zero address
    pub const ZERO: MacAddress = MacAddress([0; ADDRESS_LEN]);

    /// Create an address from its six octets
    pub const fn new(octets: [u8; ADDRESS_LEN]) -> Self {
        Self(octets)
    }

    /// Get the octets by value
    pub const fn octets(&self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// Get the octets as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Vendor (OUI) octets
    pub fn vendor(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Device (NIC) octets
    pub fn nic(&self) -> [u8; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }
}

impl From<[u8; ADDRESS_LEN]> for MacAddress {
    fn from(octets: [u8; ADDRESS_LEN]) -> Self {
        Self(octets)
    }
}

impl TryFrom<&[u8]> for MacAddress {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let octets: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}", a, b, c, d, e, g)
    }
}

impl FromStr for MacAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::InvalidFormat(s.to_string());

        let separator = if s.contains('-') { '-' } else { ':' };
        let mut octets = [0u8; ADDRESS_LEN];
        let mut count = 0;

        for part in s.split(separator) {
            if count == ADDRESS_LEN
                || part.len() != 2
                || !part.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return Err(invalid());
            }
            octets[count] = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
            count += 1;
        }

        if count != ADDRESS_LEN {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}
