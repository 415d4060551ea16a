//! Prelude module for convenient imports
//!
//! ```ignore
//! use assetpool::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Memory access: `ReadMemory`, `MemoryReader`, `ProcessHandle`
//! - Pools: `AssetPool`, `PoolTable`, `PoolDescriptor`, `SlotHandle`
//! - Schemas: `AssetRegistry`, `AssetSchema`, `FieldMetadata`, `FieldKind`, `Value`
//! - Export: `ExportSink`, `ExportOutcome`, `RecordStore`
//! - Error handling: `Error`, `Result`

// Memory access
pub use crate::memory::{MemoryReader, ProcessHandle, ReadMemory};

// Error handling
pub use crate::error::{Error, Result};

// Pools
pub use crate::pool::{AssetPool, PoolDescriptor, PoolTable, SlotHandle};

// Schemas
pub use crate::assets::AssetRegistry;
pub use crate::schema::{AssetSchema, DecodedRecord, FieldKind, FieldMetadata, Value};

// Export
pub use crate::export::{ExportOutcome, ExportSink, RecordStore};
