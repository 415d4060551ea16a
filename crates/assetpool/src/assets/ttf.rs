//! TrueType font blobs.
//!
//! Slot layout: name pointer, byte length, data pointer.

use crate::memory::ByteBuffer;
use crate::schema::{AssetSchema, FieldKind, FieldMetadata};

pub const POOL_INDEX: i32 = 80;

const SIZE_OFFSET: u32 = 0x8;

pub fn ttf_schema() -> AssetSchema {
    let fields = vec![
        FieldMetadata::new("name", 0x0, FieldKind::String),
        FieldMetadata::new("size", SIZE_OFFSET, FieldKind::Int64),
        FieldMetadata::new(
            "data",
            0x10,
            FieldKind::Blob {
                length_offset: SIZE_OFFSET,
            },
        ),
    ];

    AssetSchema::new("ttf", POOL_INDEX, fields)
        .with_setting_group("RawFile")
        .with_describe(describe_ttf)
}

fn describe_ttf(buffer: &ByteBuffer<'_>) -> Option<String> {
    let size = buffer.read_i64(SIZE_OFFSET as usize).ok()?;
    Some(format!("Size: 0x{:X}", size))
}
