//! Asset pools: descriptor lookup, slot enumeration, and per-slot export.

mod descriptor;
mod enumerate;

use std::thread;

use tracing::{debug, warn};

use crate::error::Result;
use crate::export::{ExportOutcome, ExportSink, export_asset};
use crate::memory::ReadMemory;
use crate::schema::AssetSchema;

pub use descriptor::{
    DEFAULT_DESCRIPTOR_STRIDE, MAX_SLOT_SIZE, PoolDescriptor, PoolTable, RawPoolInfo,
    read_descriptor,
};
pub use enumerate::{NO_INFORMATION, SlotHandle, enumerate};

/// A schema bound to the descriptor read for it
#[derive(Debug, Clone)]
pub struct AssetPool<'s> {
    schema: &'s AssetSchema,
    descriptor: PoolDescriptor,
}

impl<'s> AssetPool<'s> {
    /// Read the pool's descriptor from the table
    pub fn open<R: ReadMemory>(
        reader: &R,
        base_address: u64,
        table: &PoolTable,
        schema: &'s AssetSchema,
    ) -> Result<Self> {
        let descriptor = read_descriptor(reader, base_address, table, schema.pool_index)?;
        Ok(Self { schema, descriptor })
    }

    pub fn schema(&self) -> &'s AssetSchema {
        self.schema
    }

    pub fn descriptor(&self) -> &PoolDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Enumerate the pool's occupied slots
    pub fn load<R: ReadMemory>(&self, reader: &R) -> Vec<SlotHandle> {
        enumerate(reader, &self.descriptor, self.schema)
    }

    /// Export one previously enumerated slot
    pub fn export<R: ReadMemory, S: ExportSink + ?Sized>(
        &self,
        reader: &R,
        handle: &SlotHandle,
        sink: &mut S,
    ) -> Result<ExportOutcome> {
        export_asset(reader, self.schema, handle, sink)
    }
}

/// Result of loading one pool
#[derive(Debug)]
pub struct LoadedPool<'s> {
    pub schema: &'s AssetSchema,
    pub result: Result<(PoolDescriptor, Vec<SlotHandle>)>,
}

/// Open and enumerate several pools, one thread per pool.
///
/// Pools are independent, so they are walked concurrently; results come back
/// in the order of `schemas`. A failed descriptor read only fails its own pool.
pub fn load_pools<'s, R: ReadMemory>(
    reader: &R,
    base_address: u64,
    table: &PoolTable,
    schemas: &[&'s AssetSchema],
) -> Vec<LoadedPool<'s>> {
    thread::scope(|scope| {
        let workers: Vec<_> = schemas
            .iter()
            .map(|&schema| {
                let worker = scope.spawn(move || {
                    AssetPool::open(reader, base_address, table, schema).map(|pool| {
                        let handles = pool.load(reader);
                        (pool.descriptor, handles)
                    })
                });
                (schema, worker)
            })
            .collect();

        workers
            .into_iter()
            .map(|(schema, worker)| {
                let result = match worker.join() {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("Worker for pool '{}' panicked", schema.name);
                        Err(crate::error::Error::read_failed(0, "pool worker panicked"))
                    }
                };
                if let Err(e) = &result {
                    debug!("Pool '{}' failed to load: {}", schema.name, e);
                }
                LoadedPool { schema, result }
            })
            .collect()
    })
}
