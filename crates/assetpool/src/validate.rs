//! Consistency check between discovery and export.
//!
//! The target process keeps running while we read it, so a slot that held an
//! asset at enumeration time may have been freed and reused by the time it is
//! exported. The slot's identity string is resolved again from the freshly
//! read bytes and must match the name captured on the handle.

use tracing::debug;

use crate::export::ExportOutcome;
use crate::memory::{ByteBuffer, ReadMemory};
use crate::pool::SlotHandle;

pub fn validate<R: ReadMemory + ?Sized>(
    reader: &R,
    handle: &SlotHandle,
    raw: &[u8],
) -> ExportOutcome {
    let identity = match ByteBuffer::new(raw).read_u64(0) {
        Ok(ptr) => ptr,
        Err(e) => {
            debug!("Slot 0x{:X} too short for identity: {}", handle.header_address, e);
            return ExportOutcome::MemoryChanged;
        }
    };

    if identity == 0 {
        return ExportOutcome::MemoryChanged;
    }

    match reader.read_cstring(identity) {
        Ok(name) if name == handle.display_name => ExportOutcome::Success,
        Ok(name) => {
            debug!(
                "Slot 0x{:X} changed: expected '{}', found '{}'",
                handle.header_address, handle.display_name, name
            );
            ExportOutcome::MemoryChanged
        }
        Err(e) => {
            debug!(
                "Slot 0x{:X} identity unreadable: {}",
                handle.header_address, e
            );
            ExportOutcome::MemoryChanged
        }
    }
}
