//! Built-in asset types and the registry that looks them up by name.

mod physpreset;
mod ttf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::AssetSchema;

pub use physpreset::{MASS_SCALE, MASS_TAG, physpreset_schema};
pub use ttf::ttf_schema;

/// Known asset types in registration order
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    schemas: Vec<AssetSchema>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in asset type
    pub fn builtin() -> Self {
        Self {
            schemas: vec![physpreset_schema(), ttf_schema()],
        }
    }

    /// Add a schema; names must be unique
    pub fn register(&mut self, schema: AssetSchema) -> Result<()> {
        if self.schemas.iter().any(|s| s.name == schema.name) {
            return Err(Error::Config(format!(
                "asset type '{}' is already registered",
                schema.name
            )));
        }
        debug!(
            "Registered asset type '{}' (pool {}, {} fields)",
            schema.name,
            schema.pool_index,
            schema.fields.len()
        );
        self.schemas.push(schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&AssetSchema> {
        self.schemas
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownAssetType(name.to_string()))
    }

    /// Schemas belonging to a setting group (case-insensitive)
    pub fn by_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a AssetSchema> {
        self.schemas
            .iter()
            .filter(move |s| s.setting_group.eq_ignore_ascii_case(group))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
