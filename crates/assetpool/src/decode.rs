//! Struct field decoder.
//!
//! Turns one slot's raw bytes into a [`DecodedRecord`] by walking the asset
//! type's field table in order. Each field is offered to the override hook
//! first; only when the hook declines does the built-in decoder for the field
//! kind run. Fields that neither can decode are left out of the record.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::memory::{ByteBuffer, ReadMemory};
use crate::schema::{DecodedRecord, FieldContext, FieldKind, FieldMetadata, OverrideHook, Value};

/// Largest blob the decoder will copy out of the target (64 MiB)
pub const MAX_BLOB_LEN: usize = 64 * 1024 * 1024;

/// Decode `raw` slot bytes using the given field table and override hook
pub fn decode<R: ReadMemory>(
    reader: &R,
    raw: &[u8],
    fields: &[FieldMetadata],
    hook: OverrideHook,
) -> Result<DecodedRecord> {
    let buffer = ByteBuffer::new(raw);
    let mut record = DecodedRecord::with_capacity(fields.len());

    for field in fields {
        let ctx = FieldContext { buffer, field };

        let value = match hook(&ctx, reader)? {
            Some(value) => Some(value),
            None => decode_builtin(reader, &buffer, field)?,
        };

        match value {
            Some(value) => record.insert(field.name.as_str(), value),
            None => trace!(
                "Skipping field '{}' at 0x{:X}: no decoder for {:?}",
                field.name, field.offset, field.kind
            ),
        }
    }

    Ok(record)
}

/// Decode a field with the built-in rule for its kind.
///
/// Returns `Ok(None)` for [`FieldKind::Custom`] tags.
pub fn decode_builtin<R: ReadMemory + ?Sized>(
    reader: &R,
    buffer: &ByteBuffer<'_>,
    field: &FieldMetadata,
) -> Result<Option<Value>> {
    let offset = field.offset as usize;

    let value = match field.kind {
        FieldKind::Int32 => Value::Int32(buffer.read_i32(offset)?),
        FieldKind::Int64 => Value::Int64(buffer.read_i64(offset)?),
        FieldKind::Float => Value::Float(buffer.read_f32(offset)?),
        FieldKind::String => {
            let ptr = buffer.read_u64(offset)?;
            if ptr == 0 {
                Value::String(String::new())
            } else {
                Value::String(reader.read_cstring(ptr)?)
            }
        }
        FieldKind::AssetRef => {
            let ptr = buffer.read_u64(offset)?;
            if ptr == 0 {
                Value::String(String::new())
            } else {
                resolve_asset_name(reader, ptr)
            }
        }
        FieldKind::Blob { length_offset } => {
            let ptr = buffer.read_u64(offset)?;
            let length = buffer.read_i64(length_offset as usize)?;
            Value::Bytes(read_blob(reader, ptr, length)?)
        }
        FieldKind::Custom(_) => return Ok(None),
    };

    Ok(Some(value))
}

/// Referenced assets carry their own identity pointer at offset 0
fn resolve_asset_name<R: ReadMemory + ?Sized>(reader: &R, ptr: u64) -> Value {
    match reader
        .read_u64(ptr)
        .and_then(|name_ptr| reader.read_cstring(name_ptr))
    {
        Ok(name) => Value::String(name),
        Err(e) => {
            debug!("Unresolved asset reference 0x{:X}: {}", ptr, e);
            Value::Reference(ptr)
        }
    }
}

fn read_blob<R: ReadMemory + ?Sized>(reader: &R, ptr: u64, length: i64) -> Result<Vec<u8>> {
    if length == 0 {
        return Ok(Vec::new());
    }

    let length = usize::try_from(length)
        .ok()
        .filter(|len| *len <= MAX_BLOB_LEN)
        .ok_or_else(|| Error::read_failed(ptr, format!("implausible blob length {}", length)))?;

    reader.read_bytes(ptr, length)
}
