//! Key derivation for MAC addresses
//!
//! An address is projected onto two unsigned integers:
//! - the hash key, the NIC octets packed big-endian into 24 bits, which
//!   selects a bucket
//! - the order key, all six octets packed big-endian into 48 bits, which
//!   totally orders entries within a bucket
//!
//! Addresses from different vendors that share NIC octets collide on the
//! hash key. Collisions are resolved by the bucket tree.

use std::cmp::Ordering;

use crate::address::{ADDRESS_LEN, MacAddress};

/// Bits per octet
pub const BYTE_BITS: u32 = 8;
/// Number of vendor (OUI) octets
pub const VENDOR_BYTES: usize = 3;
/// Number of device (NIC) octets
pub const NIC_BYTES: usize = 3;
/// Index of the first NIC octet
pub const FIRST_NIC_BYTE: usize = VENDOR_BYTES;
/// Width of the hash key
pub const HASH_KEY_BITS: u32 = BYTE_BITS * NIC_BYTES as u32;
/// Width of the order key
pub const ORDER_KEY_BITS: u32 = BYTE_BITS * ADDRESS_LEN as u32;

const ORDER_KEY_MAX: u64 = (1 << ORDER_KEY_BITS) - 1;

/// 24-bit bucket selector
pub type HashKey = u32;
/// 48-bit total order over addresses
pub type OrderKey = u64;

/// Pack octets big-endian, first octet most significant
#[inline]
fn pack(octets: &[u8]) -> u64 {
    octets
        .iter()
        .fold(0u64, |value, &octet| (value << BYTE_BITS) | u64::from(octet))
}

/// Hash key of an address: `byte[3] << 16 | byte[4] << 8 | byte[5]`
#[inline]
pub fn hash_key(address: &MacAddress) -> HashKey {
    pack(&address.as_bytes()[FIRST_NIC_BYTE..]) as HashKey
}

/// Vendor key of an address: the OUI octets packed into 24 bits
#[inline]
pub fn vendor_key(address: &MacAddress) -> u32 {
    pack(&address.as_bytes()[..VENDOR_BYTES]) as u32
}

/// Order key of an address: all six octets packed into 48 bits
#[inline]
pub fn order_key(address: &MacAddress) -> OrderKey {
    pack(address.as_bytes())
}

/// Recover the address from an order key
///
/// Returns `None` if `key` does not fit in 48 bits.
pub fn decode_order_key(key: OrderKey) -> Option<MacAddress> {
    if key > ORDER_KEY_MAX {
        return None;
    }
    let bytes = key.to_be_bytes();
    let mut octets = [0u8; ADDRESS_LEN];
    octets.copy_from_slice(&bytes[bytes.len() - ADDRESS_LEN..]);
    Some(MacAddress::new(octets))
}

/// Three-way comparison of two addresses by order key
#[inline]
pub fn compare(a: &MacAddress, b: &MacAddress) -> Ordering {
    order_key(a).cmp(&order_key(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(octets: [u8; 6]) -> MacAddress {
        MacAddress::new(octets)
    }

    #[test]
    fn test_hash_key_uses_nic_bytes() {
        assert_eq!(hash_key(&mac([0, 0, 0, 1, 1, 1])), 0x010101);
        assert_eq!(hash_key(&mac([0, 0, 1, 1, 1, 1])), 0x010101);
        assert_eq!(hash_key(&mac([0, 1, 0, 1, 1, 1])), 0x010101);
        assert_eq!(hash_key(&mac([1, 1, 1, 0x0a, 0, 0])), 0x0a0000);
        assert_eq!(hash_key(&mac([1, 1, 1, 0, 0x0a, 0])), 0x000a00);
        assert_eq!(hash_key(&mac([0, 0, 0, 0, 0, 0x0a])), 0x00000a);
        assert_eq!(hash_key(&mac([1, 1, 1, 0, 0, 0])), 0);
        assert_eq!(hash_key(&mac([1, 1, 1, 0xff, 0xff, 0xff])), 0xffffff);
    }

    #[test]
    fn test_hash_key_ignores_vendor_bytes() {
        let nic = [0x12, 0x34, 0x56];
        let expected = hash_key(&mac([0, 0, 0, nic[0], nic[1], nic[2]]));
        for vendor in [[0xff, 0xff, 0xff], [0x00, 0x50, 0x56], [0x08, 0x00, 0x27]] {
            let addr = mac([vendor[0], vendor[1], vendor[2], nic[0], nic[1], nic[2]]);
            assert_eq!(hash_key(&addr), expected);
            assert!(hash_key(&addr) < 1 << HASH_KEY_BITS);
        }
    }

    #[test]
    fn test_order_key_packing() {
        assert_eq!(order_key(&mac([0, 0, 0, 0, 0, 1])), 1);
        assert_eq!(order_key(&mac([0x01, 0x02, 0x03, 0x04, 0x05, 0x06])), 0x0102_0304_0506);
        assert_eq!(order_key(&mac([0xff; 6])), ORDER_KEY_MAX);
        assert_eq!(vendor_key(&mac([0x01, 0x02, 0x03, 0x04, 0x05, 0x06])), 0x010203);
    }

    #[test]
    fn test_decode_order_key() {
        let addr = mac([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
        assert_eq!(decode_order_key(order_key(&addr)), Some(addr));
        assert_eq!(decode_order_key(0), Some(MacAddress::ZERO));
        assert_eq!(decode_order_key(ORDER_KEY_MAX + 1), None);
    }

    #[test]
    fn test_compare_matches_octet_order() {
        let low = mac([0x00, 0xff, 0xff, 0xff, 0xff, 0xff]);
        let high = mac([0x01, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(compare(&low, &high), Ordering::Less);
        assert_eq!(compare(&high, &low), Ordering::Greater);
        assert_eq!(compare(&high, &high), Ordering::Equal);
        assert_eq!(compare(&low, &high), low.cmp(&high));
    }
}
