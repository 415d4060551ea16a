//! # assetpool
//!
//! Recovers structured asset records from the memory of a running process.
//!
//! The target keeps each asset type in a pool: a fixed-stride array of slots
//! located through a descriptor table. This crate provides:
//! - Pool descriptor lookup and slot enumeration
//! - Table-driven decoding of slot bytes into ordered field records, with
//!   per-asset-type override hooks
//! - Detection of slots that changed between enumeration and export
//! - Export sinks (in-memory, NDJSON, raw files) and built-in asset types
//!
//! Memory access goes through the [`ReadMemory`] trait. On Windows,
//! [`MemoryReader`] reads a live process; [`MockMemoryReader`] backs tests.

pub mod assets;
pub mod decode;
pub mod error;
pub mod export;
pub mod memory;
pub mod pool;
pub mod prelude;
pub mod schema;
pub mod validate;

pub use assets::{AssetRegistry, physpreset_schema, ttf_schema};
pub use decode::decode;
pub use error::{Error, Result};
pub use export::{
    ExportOutcome, ExportSink, ExportSummary, JsonLinesSink, RawFileSink, RecordStore,
    export_asset,
};
pub use memory::{
    ByteBuffer, FromBytes, MemoryReader, MockMemoryBuilder, MockMemoryReader, ProcessHandle,
    ReadMemory,
};
pub use pool::{
    AssetPool, LoadedPool, PoolDescriptor, PoolTable, SlotHandle, enumerate, load_pools,
    read_descriptor,
};
pub use schema::{
    AssetSchema, DecodedRecord, FieldContext, FieldKind, FieldMetadata, OverrideHook, Value,
};
pub use validate::validate;
