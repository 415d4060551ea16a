//! Pool descriptor table.
//!
//! The target keeps a flat table of fixed-size descriptors, one per pool
//! type, at a known offset from its main module. Each descriptor points at the
//! pool's slot array and records the per-slot size and the slot count.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::{FromBytes, ReadMemory};

/// Default distance between consecutive descriptors
pub const DEFAULT_DESCRIPTOR_STRIDE: u64 = 0x20;

/// Largest slot the enumerator and exporter will read in one go (64 KiB)
pub const MAX_SLOT_SIZE: u32 = 0x1_0000;

/// Location and shape of the descriptor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTable {
    /// Offset of the table from the process base address
    pub table_offset: u64,
    #[serde(default = "default_descriptor_stride")]
    pub descriptor_stride: u64,
    /// Number of descriptors in the table, when known
    #[serde(default)]
    pub pool_count: Option<u32>,
}

fn default_descriptor_stride() -> u64 {
    DEFAULT_DESCRIPTOR_STRIDE
}

impl Default for PoolTable {
    fn default() -> Self {
        Self {
            table_offset: 0,
            descriptor_stride: DEFAULT_DESCRIPTOR_STRIDE,
            pool_count: None,
        }
    }
}

impl PoolTable {
    /// Absolute address of the descriptor for `pool_index`
    pub fn descriptor_address(&self, base_address: u64, pool_index: i32) -> Result<u64> {
        let index = u64::try_from(pool_index).map_err(|_| Error::InvalidPoolIndex(pool_index))?;
        if self.pool_count.is_some_and(|count| index >= u64::from(count)) {
            return Err(Error::InvalidPoolIndex(pool_index));
        }

        index
            .checked_mul(self.descriptor_stride)
            .and_then(|rel| rel.checked_add(self.table_offset))
            .and_then(|rel| rel.checked_add(base_address))
            .ok_or(Error::InvalidPoolIndex(pool_index))
    }
}

/// Descriptor layout as stored in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPoolInfo {
    pub pool_pointer: u64,
    pub item_size: u32,
    pub item_count: u32,
}

impl FromBytes for RawPoolInfo {
    const SIZE: usize = 0x10;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        let mut pointer = [0u8; 8];
        pointer.copy_from_slice(&bytes[0..8]);

        Some(Self {
            pool_pointer: u64::from_le_bytes(pointer),
            item_size: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            item_count: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}

/// A pool's slot array, read once per load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolDescriptor {
    pub start_address: u64,
    pub slot_stride: u32,
    pub slot_count: u32,
    pub pool_index: i32,
}

impl PoolDescriptor {
    pub fn end_address(&self) -> u64 {
        self.start_address
            .saturating_add(u64::from(self.slot_stride) * u64::from(self.slot_count))
    }

    /// Address of slot `index`, or `None` past the end of the address space
    pub fn slot_address(&self, index: u32) -> Option<u64> {
        u64::from(index)
            .checked_mul(u64::from(self.slot_stride))
            .and_then(|rel| self.start_address.checked_add(rel))
    }

    /// Whether an identity pointer marks an unused slot.
    ///
    /// Freed slots either hold zero or point back into the pool's own slot
    /// array (the closed range `[start, end]`).
    pub fn is_empty_slot(&self, identity: u64) -> bool {
        identity == 0 || (identity >= self.start_address && identity <= self.end_address())
    }
}

/// Read the descriptor for `pool_index`
pub fn read_descriptor<R: ReadMemory>(
    reader: &R,
    base_address: u64,
    table: &PoolTable,
    pool_index: i32,
) -> Result<PoolDescriptor> {
    let address = table.descriptor_address(base_address, pool_index)?;
    let raw: RawPoolInfo = reader.read_struct(address)?;

    debug!(
        "Pool {} descriptor at 0x{:X}: start=0x{:X}, stride=0x{:X}, count={}",
        pool_index, address, raw.pool_pointer, raw.item_size, raw.item_count
    );

    if raw.item_size > MAX_SLOT_SIZE {
        return Err(Error::read_failed(
            address,
            format!("implausible slot stride 0x{:X}", raw.item_size),
        ));
    }

    let descriptor = PoolDescriptor {
        start_address: raw.pool_pointer,
        slot_stride: raw.item_size,
        slot_count: raw.item_count,
        pool_index,
    };

    // The end of the slot array must be addressable
    if descriptor.slot_count > 0 && descriptor.slot_address(descriptor.slot_count).is_none() {
        return Err(Error::read_failed(
            address,
            format!(
                "slot array at 0x{:X} ({} x 0x{:X}) overflows the address space",
                raw.pool_pointer, raw.item_count, raw.item_size
            ),
        ));
    }

    Ok(descriptor)
}
