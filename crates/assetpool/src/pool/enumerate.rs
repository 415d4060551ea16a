//! Slot enumeration.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::memory::{ByteBuffer, ReadMemory};
use crate::pool::{MAX_SLOT_SIZE, PoolDescriptor};
use crate::schema::AssetSchema;

/// Default summary for slots whose type has no describe function
pub const NO_INFORMATION: &str = "N/A";

/// An occupied slot found during enumeration.
///
/// Handles are snapshots: nothing tracks the slot afterwards, so a handle can
/// go stale when the target reuses the slot. Export re-checks the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotHandle {
    /// Address of the identity string
    pub identity_address: u64,
    /// Address of the slot itself
    pub header_address: u64,
    /// Number of slot bytes to read on export
    pub size: u32,
    pub display_name: String,
    pub asset_type: String,
    pub information: String,
}

/// Walk every slot of a pool and return the occupied ones in slot order.
///
/// Per-slot read failures skip that slot and never abort the walk.
pub fn enumerate<R: ReadMemory>(
    reader: &R,
    descriptor: &PoolDescriptor,
    schema: &AssetSchema,
) -> Vec<SlotHandle> {
    let mut handles = Vec::new();

    if descriptor.slot_stride < 8 {
        warn!(
            "Pool '{}' has slot stride {}, too small for an identity pointer",
            schema.name, descriptor.slot_stride
        );
        return handles;
    }
    if descriptor.slot_stride > MAX_SLOT_SIZE {
        warn!(
            "Pool '{}' has slot stride 0x{:X}, refusing to walk it",
            schema.name, descriptor.slot_stride
        );
        return handles;
    }

    let mut empty = 0u32;
    let mut failed = 0u32;

    for index in 0..descriptor.slot_count {
        let Some(address) = descriptor.slot_address(index) else {
            warn!(
                "Pool '{}' runs past the end of the address space at slot {}",
                schema.name, index
            );
            break;
        };

        match read_slot(reader, descriptor, schema, address) {
            Ok(Some(handle)) => handles.push(handle),
            Ok(None) => empty += 1,
            Err(e) => {
                failed += 1;
                warn!("Skipping {} slot {} (0x{:X}): {}", schema.name, index, address, e);
            }
        }
    }

    info!(
        "Pool '{}': {} assets, {} empty, {} unreadable of {} slots",
        schema.name,
        handles.len(),
        empty,
        failed,
        descriptor.slot_count
    );

    handles
}

fn read_slot<R: ReadMemory>(
    reader: &R,
    descriptor: &PoolDescriptor,
    schema: &AssetSchema,
    address: u64,
) -> Result<Option<SlotHandle>> {
    // Types with a summary need the whole slot; the rest only the identity
    let (identity, information) = match schema.describe {
        Some(describe) => {
            let raw = reader.read_bytes(address, descriptor.slot_stride as usize)?;
            let buffer = ByteBuffer::new(&raw);
            let identity = buffer.read_u64(0)?;
            let information = if descriptor.is_empty_slot(identity) {
                None
            } else {
                describe(&buffer)
            };
            (identity, information)
        }
        None => (reader.read_u64(address)?, None),
    };

    if descriptor.is_empty_slot(identity) {
        debug!("Empty slot at 0x{:X} (identity 0x{:X})", address, identity);
        return Ok(None);
    }

    let display_name = reader.read_cstring(identity)?;

    Ok(Some(SlotHandle {
        identity_address: identity,
        header_address: address,
        size: descriptor.slot_stride,
        display_name,
        asset_type: schema.name.clone(),
        information: information.unwrap_or_else(|| NO_INFORMATION.to_string()),
    }))
}
