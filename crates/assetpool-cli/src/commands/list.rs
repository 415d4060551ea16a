//! List command implementation.

use anyhow::Result;
use assetpool::{AssetSchema, PoolTable, ReadMemory, SlotHandle, load_pools};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct PoolListing<'a> {
    asset_type: &'a str,
    assets: &'a [SlotHandle],
}

/// Enumerate every selected pool and print its assets
pub fn run<R: ReadMemory>(
    reader: &R,
    base_address: u64,
    table: &PoolTable,
    schemas: &[&AssetSchema],
    json: bool,
) -> Result<()> {
    let loaded = load_pools(reader, base_address, table, schemas);
    let mut listings = Vec::new();

    for pool in &loaded {
        match &pool.result {
            Ok((_, handles)) => listings.push(PoolListing {
                asset_type: &pool.schema.name,
                assets: handles,
            }),
            Err(e) => error!("Failed to load pool '{}': {}", pool.schema.name, e),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    for listing in &listings {
        println!(
            "{} ({} assets)",
            listing.asset_type.bold(),
            listing.assets.len()
        );
        for handle in listing.assets {
            println!(
                "  0x{:X}  {:<48} {}",
                handle.header_address,
                handle.display_name,
                handle.information.dimmed()
            );
        }
    }

    Ok(())
}
