use ahash::AHashMap;
use quickcheck::QuickCheck;

use crate::address::MacAddress;
use crate::codec::{self, HASH_KEY_BITS, ORDER_KEY_BITS};
use crate::entry::{BridgeEntry, INVALID_INTERFACE};
use crate::error::Error;
use crate::table::BridgeTable;
use crate::tree::{self, Link};

const ADDRESS_MASK: u64 = (1 << ORDER_KEY_BITS) - 1;

// Small key spaces so that generated operations collide and repeat
const VENDORS: u8 = 4;
const NICS: u8 = 16;

fn address(raw: u64) -> MacAddress {
    codec::decode_order_key(raw & ADDRESS_MASK).expect("masked to 48 bits")
}

fn small_address(vendor: u8, nic: u8) -> MacAddress {
    MacAddress::new([vendor % VENDORS, 0, 0, 0, 0, nic % NICS])
}

fn prop_order_key_round_trip(raw: u64) -> bool {
    let addr = address(raw);
    let key = codec::order_key(&addr);
    key == raw & ADDRESS_MASK && codec::decode_order_key(key) == Some(addr)
}

fn prop_hash_key_ignores_vendor(raw: u64, vendor: u32) -> bool {
    let addr = address(raw);
    let mut octets = addr.octets();
    octets[..3].copy_from_slice(&vendor.to_be_bytes()[1..]);
    let rebranded = MacAddress::new(octets);

    codec::hash_key(&addr) == codec::hash_key(&rebranded) && codec::hash_key(&addr) < 1 << HASH_KEY_BITS
}

fn prop_order_key_preserves_order(a: u64, b: u64) -> bool {
    let (a, b) = (address(a), address(b));
    codec::compare(&a, &b) == a.cmp(&b)
}

fn prop_tree_matches_model(ops: Vec<(u16, i32)>) -> bool {
    let mut root: Link = None;
    let mut model = AHashMap::new();

    for (raw, interface) in ops {
        let entry = BridgeEntry::new(address(u64::from(raw % 512)), interface);
        let result = tree::insert(&mut root, entry);
        if model.contains_key(entry.address()) {
            if result != Err(Error::DuplicateKey(*entry.address())) {
                return false;
            }
        } else {
            if result.is_err() {
                return false;
            }
            model.insert(*entry.address(), interface);
        }
    }

    let keys: Vec<_> = tree::iter(&root).map(|e| codec::order_key(e.address())).collect();
    tree::len(&root) == model.len()
        && keys.windows(2).all(|pair| pair[0] < pair[1])
        && model.iter().all(|(addr, &interface)| {
            tree::find(&root, codec::order_key(addr)).map(BridgeEntry::interface) == Some(interface)
        })
}

fn prop_table_matches_model(ops: Vec<(u8, u8, i32)>) -> bool {
    let mut table = BridgeTable::new();
    let mut model = AHashMap::new();

    for (vendor, nic, interface) in ops {
        let addr = small_address(vendor, nic);
        let before = table.len();
        match table.add(BridgeEntry::new(addr, interface)) {
            Ok(()) => {
                if model.insert(addr, interface).is_some() {
                    return false;
                }
            }
            Err(Error::DuplicateKey(dup)) => {
                // rejected adds change nothing
                if dup != addr || !model.contains_key(&addr) || table.len() != before {
                    return false;
                }
            }
            Err(_) => return false,
        }
    }

    for vendor in 0..VENDORS {
        for nic in 0..NICS {
            let addr = small_address(vendor, nic);
            let expected = model.get(&addr).map(|&interface| BridgeEntry::new(addr, interface));
            if table.find(&addr).ok() != Some(expected.as_ref()) {
                return false;
            }
            if expected.is_none() && table.find_interface(&addr) != Ok(INVALID_INTERFACE) {
                return false;
            }
        }
    }

    table.len() == model.len()
        && table.iter().count() == model.len()
        && table.stats().map(|stats| stats.entries) == Ok(model.len())
}

fn prop_initialize_forgets_everything(ops: Vec<(u8, u8)>) -> bool {
    let mut table = BridgeTable::new();
    for &(vendor, nic) in &ops {
        let _ = table.add(BridgeEntry::new(small_address(vendor, nic), 1));
    }

    table.initialize();

    table.is_empty()
        && ops
            .iter()
            .all(|&(vendor, nic)| table.find(&small_address(vendor, nic)) == Ok(None))
}

#[test]
fn order_key_round_trips() {
    QuickCheck::new().quickcheck(prop_order_key_round_trip as fn(u64) -> bool);
}

#[test]
fn hash_key_ignores_vendor_octets() {
    QuickCheck::new().quickcheck(prop_hash_key_ignores_vendor as fn(u64, u32) -> bool);
}

#[test]
fn order_key_preserves_octet_order() {
    QuickCheck::new().quickcheck(prop_order_key_preserves_order as fn(u64, u64) -> bool);
}

#[test]
fn tree_matches_reference_map() {
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop_tree_matches_model as fn(Vec<(u16, i32)>) -> bool);
}

#[test]
fn table_matches_reference_map() {
    QuickCheck::new()
        .tests(30)
        .quickcheck(prop_table_matches_model as fn(Vec<(u8, u8, i32)>) -> bool);
}

#[test]
fn initialize_forgets_everything() {
    QuickCheck::new()
        .tests(30)
        .quickcheck(prop_initialize_forgets_everything as fn(Vec<(u8, u8)>) -> bool);
}
