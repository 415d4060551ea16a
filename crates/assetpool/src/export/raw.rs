//! Writes byte fields of exported records to disk.
//!
//! Each record's first [`Value::Bytes`] field becomes a file named after the
//! asset's identity, under `<root>/<asset type>/`. Records without byte fields
//! are ignored.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use super::ExportSink;
use crate::error::{Error, Result};
use crate::schema::{DecodedRecord, Value};

#[derive(Debug, Clone)]
pub struct RawFileSink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl RawFileSink {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Output path for an identity; rejects names escaping the root
    fn target_path(&self, asset_type: &str, identity: &str) -> Result<PathBuf> {
        let relative = Path::new(identity);
        let safe = !identity.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(Error::Config(format!(
                "refusing to write asset with unsafe name '{}'",
                identity
            )));
        }
        Ok(self.root.join(asset_type).join(relative))
    }
}

impl ExportSink for RawFileSink {
    fn accept(&mut self, asset_type: &str, identity: &str, record: DecodedRecord) -> Result<()> {
        let Some(bytes) = record.iter().find_map(|(_, v)| match v {
            Value::Bytes(b) => Some(b),
            _ => None,
        }) else {
            debug!("{} '{}' has no byte fields, not writing", asset_type, identity);
            return Ok(());
        };

        let path = self.target_path(asset_type, identity)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        info!("Wrote {} bytes to {}", bytes.len(), path.display());

        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn blob_record(data: &[u8]) -> DecodedRecord {
        let mut record = DecodedRecord::new();
        record.insert("name", Value::String("x".into()));
        record.insert("size", Value::Int64(data.len() as i64));
        record.insert("data", Value::Bytes(data.to_vec()));
        record
    }

    #[test]
    fn test_writes_nested_path() {
        let dir = TempDir::new().unwrap();
        let mut sink = RawFileSink::new(dir.path());

        sink.accept("ttf", "fonts/main.ttf", blob_record(b"\x00\x01\x00\x00"))
            .unwrap();

        let path = dir.path().join("ttf").join("fonts").join("main.ttf");
        assert_eq!(fs::read(&path).unwrap(), b"\x00\x01\x00\x00");
        assert_eq!(sink.written(), [path]);
    }

    #[test]
    fn test_ignores_records_without_bytes() {
        let dir = TempDir::new().unwrap();
        let mut sink = RawFileSink::new(dir.path());

        let mut record = DecodedRecord::new();
        record.insert("mass", Value::Float(1.0));
        sink.accept("physpreset", "default", record).unwrap();

        assert!(sink.written().is_empty());
        assert!(!dir.path().join("physpreset").exists());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = TempDir::new().unwrap();
        let mut sink = RawFileSink::new(dir.path());

        assert!(sink.accept("ttf", "../evil.ttf", blob_record(b"x")).is_err());
        assert!(sink.accept("ttf", "/abs.ttf", blob_record(b"x")).is_err());
        assert!(sink.written().is_empty());
    }
}
