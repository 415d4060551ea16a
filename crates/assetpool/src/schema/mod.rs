//! Per-asset-type field tables.
//!
//! An [`AssetSchema`] describes how one pool's slots are laid out: an ordered
//! list of [`FieldMetadata`] plus an optional override hook that gets first
//! refusal on every field before the built-in decoders run.

mod value;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::error::Result;
use crate::memory::{ByteBuffer, ReadMemory};

pub use value::{DecodedRecord, Value};

/// Numeric type tags understood by the built-in decoders
pub mod tag {
    pub const STRING: u32 = 0x00;
    pub const INT32: u32 = 0x04;
    pub const INT64: u32 = 0x05;
    pub const FLOAT: u32 = 0x08;
    pub const ASSET_REF: u32 = 0x0A;
}

/// How a field's bytes are interpreted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    /// Pointer to a null-terminated string
    String,
    Int32,
    Int64,
    Float,
    /// Pointer to another asset; the value is that asset's identity string
    AssetRef,
    /// Pointer to `length` raw bytes, `length` being the int64 at `length_offset`
    Blob { length_offset: u32 },
    /// Tag with no built-in meaning; only an override hook can decode it
    Custom(u32),
}

impl FieldKind {
    /// Map a numeric type tag onto a kind.
    ///
    /// Blobs need a length location and are never produced from a bare tag.
    pub fn from_tag(value: u32) -> Self {
        match value {
            tag::STRING => Self::String,
            tag::INT32 => Self::Int32,
            tag::INT64 => Self::Int64,
            tag::FLOAT => Self::Float,
            tag::ASSET_REF => Self::AssetRef,
            other => Self::Custom(other),
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// One decodable field of a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    pub offset: u32,
    pub kind: FieldKind,
}

impl FieldMetadata {
    pub fn new(name: impl Into<String>, offset: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            offset,
            kind,
        }
    }

    /// Build from a numeric type tag (see [`FieldKind::from_tag`])
    pub fn tagged(name: impl Into<String>, offset: u32, tag: u32) -> Self {
        Self::new(name, offset, FieldKind::from_tag(tag))
    }
}

/// What an override hook sees for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub buffer: ByteBuffer<'a>,
    pub field: &'a FieldMetadata,
}

impl FieldContext<'_> {
    pub fn offset(&self) -> usize {
        self.field.offset as usize
    }
}

/// Asset-type specific decoding.
///
/// `Ok(None)` declines the field and lets the built-in decoder handle it.
pub type OverrideHook = fn(&FieldContext<'_>, &dyn ReadMemory) -> Result<Option<Value>>;

/// One-line summary of a slot shown next to its name in listings
pub type DescribeFn = fn(&ByteBuffer<'_>) -> Option<String>;

/// Hook that never claims a field
pub fn no_override(_ctx: &FieldContext<'_>, _reader: &dyn ReadMemory) -> Result<Option<Value>> {
    Ok(None)
}

/// Layout and decoding rules for one asset type
#[derive(Debug, Clone)]
pub struct AssetSchema {
    pub name: String,
    /// Grouping used to select several pools at once (e.g. "Physics")
    pub setting_group: String,
    pub pool_index: i32,
    pub fields: Vec<FieldMetadata>,
    pub hook: OverrideHook,
    pub describe: Option<DescribeFn>,
}

impl AssetSchema {
    pub fn new(name: impl Into<String>, pool_index: i32, fields: Vec<FieldMetadata>) -> Self {
        Self {
            name: name.into(),
            setting_group: "Misc".to_string(),
            pool_index,
            fields,
            hook: no_override,
            describe: None,
        }
    }

    pub fn with_setting_group(mut self, group: impl Into<String>) -> Self {
        self.setting_group = group.into();
        self
    }

    pub fn with_hook(mut self, hook: OverrideHook) -> Self {
        self.hook = hook;
        self
    }

    pub fn with_describe(mut self, describe: DescribeFn) -> Self {
        self.describe = Some(describe);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}
