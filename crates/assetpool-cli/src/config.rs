//! Target configuration.
//!
//! ```toml
//! process_name = "BlackOps3"
//! output_dir = "exported_files"
//!
//! [pool_table]
//! table_offset = 0x93FA2B0
//! descriptor_stride = 0x20
//!
//! [[asset]]
//! name = "rumble"
//! setting_group = "Rumble"
//! pool_index = 71
//! fields = [
//!     { name = "name", offset = 0x0, kind = "string" },
//!     { name = "duration", offset = 0x8, kind = "float" },
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use assetpool::{AssetRegistry, AssetSchema, FieldMetadata, PoolTable};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Executable name searched for when no PID is given
    pub process_name: String,
    /// Root directory for raw exports
    pub output_dir: PathBuf,
    pub pool_table: PoolTable,
    /// Extra asset types on top of the built-in ones
    #[serde(rename = "asset")]
    pub assets: Vec<AssetConfig>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            process_name: "BlackOps3".to_string(),
            output_dir: PathBuf::from("exported_files"),
            pool_table: PoolTable::default(),
            assets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub name: String,
    #[serde(default = "default_setting_group")]
    pub setting_group: String,
    pub pool_index: i32,
    pub fields: Vec<FieldMetadata>,
}

fn default_setting_group() -> String {
    "Misc".to_string()
}

impl TargetConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        for asset in &config.assets {
            asset.check()?;
        }
        Ok(config)
    }

    /// Built-in asset types plus the configured ones
    pub fn registry(&self) -> Result<AssetRegistry> {
        let mut registry = AssetRegistry::builtin();
        for asset in &self.assets {
            registry.register(asset.to_schema())?;
        }
        Ok(registry)
    }
}

impl AssetConfig {
    fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("asset with pool index {} has no name", self.pool_index);
        }
        if self.fields.is_empty() {
            bail!("asset '{}' declares no fields", self.name);
        }
        Ok(())
    }

    pub fn to_schema(&self) -> AssetSchema {
        AssetSchema::new(self.name.clone(), self.pool_index, self.fields.clone())
            .with_setting_group(self.setting_group.clone())
    }
}
