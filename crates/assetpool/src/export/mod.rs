//! Export orchestration and sinks.
//!
//! [`export_asset`] re-reads a slot, checks it still holds the asset found
//! during enumeration, decodes it and hands the record to an [`ExportSink`].
//! Sinks decide where records end up:
//!
//! - [`RecordStore`]: in memory, grouped by asset type
//! - [`JsonLinesSink`]: one JSON object per line
//! - [`RawFileSink`]: byte fields written out as files

mod json;
mod raw;
mod store;

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::{debug, warn};

use crate::decode::decode;
use crate::error::{Error, Result};
use crate::memory::ReadMemory;
use crate::pool::{MAX_SLOT_SIZE, SlotHandle};
use crate::schema::{AssetSchema, DecodedRecord};
use crate::validate::validate;

pub use json::JsonLinesSink;
pub use raw::RawFileSink;
pub use store::RecordStore;

/// Result of exporting one asset.
///
/// Read failures are reported separately through `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
pub enum ExportOutcome {
    Success,
    /// The slot no longer holds the asset that was enumerated
    MemoryChanged,
}

/// Receives decoded records
pub trait ExportSink {
    fn accept(&mut self, asset_type: &str, identity: &str, record: DecodedRecord) -> Result<()>;
}

impl<S: ExportSink + ?Sized> ExportSink for &mut S {
    fn accept(&mut self, asset_type: &str, identity: &str, record: DecodedRecord) -> Result<()> {
        (**self).accept(asset_type, identity, record)
    }
}

/// Export one enumerated slot.
///
/// On [`ExportOutcome::MemoryChanged`] neither the decoder nor the sink runs.
pub fn export_asset<R: ReadMemory, S: ExportSink + ?Sized>(
    reader: &R,
    schema: &AssetSchema,
    handle: &SlotHandle,
    sink: &mut S,
) -> Result<ExportOutcome> {
    if handle.size > MAX_SLOT_SIZE {
        return Err(Error::read_failed(
            handle.header_address,
            format!("implausible slot size 0x{:X}", handle.size),
        ));
    }
    let raw = reader.read_bytes(handle.header_address, handle.size as usize)?;

    if validate(reader, handle, &raw) == ExportOutcome::MemoryChanged {
        warn!(
            "Memory changed for {} '{}' at 0x{:X}, skipping",
            schema.name, handle.display_name, handle.header_address
        );
        return Ok(ExportOutcome::MemoryChanged);
    }

    let record = decode(reader, &raw, &schema.fields, schema.hook)?;
    debug!(
        "Decoded {} '{}' ({} fields)",
        schema.name,
        handle.display_name,
        record.len()
    );

    sink.accept(&schema.name, &handle.display_name, record)?;
    Ok(ExportOutcome::Success)
}

/// Running totals for a batch of exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub exported: usize,
    pub memory_changed: usize,
    pub failed: usize,
}

impl ExportSummary {
    pub fn record(&mut self, result: &Result<ExportOutcome>) {
        match result {
            Ok(ExportOutcome::Success) => self.exported += 1,
            Ok(ExportOutcome::MemoryChanged) => self.memory_changed += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.exported + self.memory_changed + self.failed
    }
}
