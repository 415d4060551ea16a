//! Export command implementation.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assetpool::{
    AssetPool, AssetSchema, ExportSink, ExportSummary, JsonLinesSink, PoolTable, RawFileSink,
    ReadMemory, RecordStore,
};
use owo_colors::OwoColorize;
use tracing::{error, info, warn};

use crate::cli::ExportFormat;
use crate::shutdown::ShutdownSignal;

pub struct ExportTarget<'a> {
    pub base_address: u64,
    pub table: &'a PoolTable,
    pub output_dir: &'a Path,
}

/// Export every asset of the selected pools
pub fn run<R: ReadMemory>(
    reader: &R,
    target: &ExportTarget<'_>,
    schemas: &[&AssetSchema],
    format: ExportFormat,
    output: Option<&Path>,
    shutdown: &ShutdownSignal,
) -> Result<ExportSummary> {
    let summary = match format {
        ExportFormat::Ndjson => {
            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(io::stdout().lock()),
            };
            let mut sink = JsonLinesSink::new(writer);
            let summary = export_pools(reader, target, schemas, &mut sink, shutdown);
            sink.flush()?;
            summary
        }
        ExportFormat::Json => {
            let mut store = RecordStore::new();
            let summary = export_pools(reader, target, schemas, &mut store, shutdown);
            let json = store.to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(path, json)?;
                    info!("Exported to: {}", path.display());
                }
                None => println!("{}", json),
            }
            summary
        }
        ExportFormat::Raw => {
            let root: PathBuf = output.unwrap_or(target.output_dir).to_path_buf();
            let mut sink = RawFileSink::new(&root);
            let summary = export_pools(reader, target, schemas, &mut sink, shutdown);
            info!("Wrote {} files under {}", sink.written().len(), root.display());
            summary
        }
    };

    let changed = format!("{} changed", summary.memory_changed);
    let failed = format!("{} failed", summary.failed);
    eprintln!(
        "{} exported, {}, {}",
        summary.exported.green(),
        changed.yellow(),
        failed.red()
    );

    Ok(summary)
}

/// Walk each pool and push every asset through the sink.
///
/// Changed or unreadable assets are counted and skipped; a pool whose
/// descriptor cannot be read is skipped as a whole.
fn export_pools<R: ReadMemory, S: ExportSink + ?Sized>(
    reader: &R,
    target: &ExportTarget<'_>,
    schemas: &[&AssetSchema],
    sink: &mut S,
    shutdown: &ShutdownSignal,
) -> ExportSummary {
    let mut summary = ExportSummary::default();

    for &schema in schemas {
        let pool = match AssetPool::open(reader, target.base_address, target.table, schema) {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to read pool '{}': {}", schema.name, e);
                continue;
            }
        };

        let handles = pool.load(reader);
        info!("Exporting {} {} assets", handles.len(), schema.name);

        for handle in &handles {
            if shutdown.is_shutdown() {
                warn!("Interrupted, stopping export");
                return summary;
            }

            let result = pool.export(reader, handle, sink);
            if let Err(e) = &result {
                warn!(
                    "Failed to export {} '{}': {}",
                    schema.name, handle.display_name, e
                );
            }
            summary.record(&result);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetpool::{MockMemoryBuilder, MockMemoryReader, ttf_schema};
    use tempfile::TempDir;

    const BASE: u64 = 0x1_4000_0000;
    const POOL: u64 = 0x2000_0000;

    /// Two ttf slots, the second with a dangling data pointer
    fn process() -> MockMemoryReader {
        let desc = BASE + 80 * 0x20;
        let mut mem = MockMemoryBuilder::new()
            .with_u64(desc, POOL)
            .with_u32(desc + 8, 0x18)
            .with_u32(desc + 12, 2)
            .with_zeroed(POOL, 0x30)
            .with_cstring(0x3000_0000, "fonts/a.ttf")
            .with_cstring(0x3000_0100, "fonts/b.ttf")
            .with_bytes(0x3100_0000, b"font")
            .build();

        mem.write_u64(POOL, 0x3000_0000);
        mem.write(POOL + 8, &4i64.to_le_bytes());
        mem.write_u64(POOL + 0x10, 0x3100_0000);

        mem.write_u64(POOL + 0x18, 0x3000_0100);
        mem.write(POOL + 0x20, &4i64.to_le_bytes());
        mem.write_u64(POOL + 0x28, 0x5100_0000);
        mem
    }

    #[test]
    fn test_raw_export_counts_failures() {
        let mem = process();
        let dir = TempDir::new().unwrap();
        let table = PoolTable::default();
        let target = ExportTarget {
            base_address: BASE,
            table: &table,
            output_dir: dir.path(),
        };
        let schema = ttf_schema();

        let summary = run(
            &mem,
            &target,
            &[&schema],
            ExportFormat::Raw,
            None,
            &ShutdownSignal::new(),
        )
        .unwrap();

        assert_eq!(summary.exported, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.memory_changed, 0);
        let written = std::fs::read(dir.path().join("ttf").join("fonts").join("a.ttf")).unwrap();
        assert_eq!(written, b"font");
    }

    #[test]
    fn test_json_export_to_file() {
        let mem = process();
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.json");
        let table = PoolTable::default();
        let target = ExportTarget {
            base_address: BASE,
            table: &table,
            output_dir: dir.path(),
        };
        let schema = ttf_schema();

        run(
            &mem,
            &target,
            &[&schema],
            ExportFormat::Json,
            Some(&out),
            &ShutdownSignal::new(),
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["ttf"]["fonts/a.ttf"]["size"], 4);
        assert_eq!(value["ttf"]["fonts/a.ttf"]["data"], "666F6E74");
        assert!(value["ttf"].get("fonts/b.ttf").is_none());
    }

    #[test]
    fn test_shutdown_stops_before_first_asset() {
        let mem = process();
        let table = PoolTable::default();
        let dir = TempDir::new().unwrap();
        let target = ExportTarget {
            base_address: BASE,
            table: &table,
            output_dir: dir.path(),
        };
        let schema = ttf_schema();
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let mut store = RecordStore::new();
        let summary = export_pools(&mem, &target, &[&schema], &mut store, &shutdown);
        assert_eq!(summary.total(), 0);
        assert!(store.is_empty());
    }
}
