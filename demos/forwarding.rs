//! Forwarding table example
//!
//! Learns a handful of addresses, looks them up, and shows how a duplicate
//! address is rejected.

use std::time::Instant;
use bridge_table::{BridgeEntry, BridgeTable, Error, INVALID_INTERFACE, MacAddress};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = BridgeTable::new();

    println!("=== Learning ===");

    let learned = [
        ("00:00:00:00:00:01", 1),
        ("00:00:00:00:01:01", 9),
        ("00:00:00:01:00:01", 4),
        ("00:00:01:00:00:01", 4),
        ("00:01:00:00:00:01", 7),
    ];
    for (text, interface) in learned {
        let address: MacAddress = text.parse()?;
        table.add(BridgeEntry::new(address, interface))?;
        println!("  {} -> interface {}", address, interface);
    }

    println!("\n=== Lookup ===");

    for text in ["00:00:00:01:00:01", "00:00:00:00:00:FF"] {
        let address: MacAddress = text.parse()?;
        match table.find_interface(&address)? {
            INVALID_INTERFACE => println!("  {} is unknown, flood", address),
            interface => println!("  {} -> interface {}", address, interface),
        }
    }

    println!("\n=== Duplicate ===");

    let address: MacAddress = "00:00:00:00:00:01".parse()?;
    match table.add(BridgeEntry::new(address, 3)) {
        Err(Error::DuplicateKey(dup)) => println!("  rejected {}", dup),
        other => other?,
    }
    println!("  {} still -> interface {}", address, table.find_interface(&address)?);

    println!("\n=== Performance Test ===");

    // 100,000 devices from 10 vendors, every NIC suffix shared by all vendors
    let start = Instant::now();
    for i in 0..100_000u32 {
        let [_, vendor, hi, lo] = (((i % 10) << 16) | (i / 10)).to_be_bytes();
        let address = MacAddress::new([0x02, 0x00, vendor, 0x00, hi, lo]);
        table.add(BridgeEntry::new(address, (i % 8) as i32))?;
    }
    let insert_duration = start.elapsed();
    println!(
        "Learned 100,000 addresses in {:?} ({:.2} adds/sec)",
        insert_duration,
        100_000.0 / insert_duration.as_secs_f64()
    );

    let stats = table.stats()?;
    println!(
        "{} entries in {} buckets, {} with collisions, deepest tree {}",
        stats.entries, stats.occupied_buckets, stats.collided_buckets, stats.max_depth
    );

    Ok(())
}
