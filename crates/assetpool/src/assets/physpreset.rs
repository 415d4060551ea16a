//! Physics presets.
//!
//! Mass is stored scaled down by a factor of 1000 under its own type tag, so
//! the override hook rescales it before the generic float decoder would see it.
//! The two impact tables at the end are sub-table references and are left out
//! of the record.

use crate::error::Result;
use crate::memory::ReadMemory;
use crate::schema::{AssetSchema, FieldContext, FieldKind, FieldMetadata, Value};

pub const POOL_INDEX: i32 = 0;

/// Type tag of the scaled mass field
pub const MASS_TAG: u32 = 0x34;

/// Stored mass = real mass × `MASS_SCALE`
pub const MASS_SCALE: f64 = 0.001;

const FIELDS: &[(&str, u32, u32)] = &[
    ("name", 0x0, 0x0),
    ("flags", 0x8, 0x4),
    ("mass", 0xc, MASS_TAG),
    ("bounce", 0x10, 0x8),
    ("friction", 0x14, 0x8),
    ("damping_linear", 0x18, 0x8),
    ("damping_angular", 0x1c, 0x8),
    ("bulletForceScale", 0x20, 0x8),
    ("explosiveForceScale", 0x24, 0x8),
    ("sndAliasPrefix", 0x28, 0x0),
    ("canFloat", 0x30, 0x4),
    ("gravityScale", 0x34, 0x8),
    ("massOffsetX", 0x38, 0x8),
    ("massOffsetY", 0x3c, 0x8),
    ("massOffsetZ", 0x40, 0x8),
    ("buoyancyMinX", 0x44, 0x8),
    ("buoyancyMinY", 0x48, 0x8),
    ("buoyancyMinZ", 0x4c, 0x8),
    ("buoyancyMaxX", 0x50, 0x8),
    ("buoyancyMaxY", 0x54, 0x8),
    ("buoyancyMaxZ", 0x58, 0x8),
    ("trailFX", 0x60, 0xa),
    ("impactsFXTable", 0x68, 0x23),
    ("impactsSoundsTable", 0x70, 0x22),
];

pub fn physpreset_schema() -> AssetSchema {
    let fields = FIELDS
        .iter()
        .map(|&(name, offset, tag)| FieldMetadata::tagged(name, offset, tag))
        .collect();

    AssetSchema::new("physpreset", POOL_INDEX, fields)
        .with_setting_group("Physics")
        .with_hook(physpreset_override)
}

fn physpreset_override(ctx: &FieldContext<'_>, _reader: &dyn ReadMemory) -> Result<Option<Value>> {
    match ctx.field.kind {
        FieldKind::Custom(MASS_TAG) => {
            let stored = ctx.buffer.read_f32(ctx.offset())?;
            Ok(Some(Value::Float((f64::from(stored) / MASS_SCALE) as f32)))
        }
        _ => Ok(None),
    }
}
