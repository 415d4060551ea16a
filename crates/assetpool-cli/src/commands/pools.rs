//! Pools command implementation.

use anyhow::Result;
use assetpool::{AssetPool, AssetSchema, PoolTable, ReadMemory};
use owo_colors::OwoColorize;

/// Print the descriptor of each selected pool
pub fn run<R: ReadMemory>(
    reader: &R,
    base_address: u64,
    table: &PoolTable,
    schemas: &[&AssetSchema],
) -> Result<()> {
    println!(
        "{:<16} {:>5}  {:>18}  {:>8}  {:>6}  {:>18}",
        "Pool", "Index", "Start", "Stride", "Slots", "End"
    );

    for &schema in schemas {
        match AssetPool::open(reader, base_address, table, schema) {
            Ok(pool) => {
                let desc = pool.descriptor();
                println!(
                    "{:<16} {:>5}  {:>#18x}  {:>#8x}  {:>6}  {:>#18x}",
                    schema.name,
                    desc.pool_index,
                    desc.start_address,
                    desc.slot_stride,
                    desc.slot_count,
                    desc.end_address()
                );
            }
            Err(e) => {
                println!(
                    "{:<16} {:>5}  {}",
                    schema.name,
                    schema.pool_index,
                    format!("error: {}", e).red()
                );
            }
        }
    }

    Ok(())
}
