//! NDJSON sink

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ExportSink;
use crate::error::Result;
use crate::schema::DecodedRecord;

/// One line per record.
///
/// Lines go straight to the writer; wrap files in a `BufWriter` and call
/// [`JsonLinesSink::flush`] once the batch is done.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

#[derive(Serialize)]
struct Line<'a> {
    asset_type: &'a str,
    name: &'a str,
    exported_at: String,
    fields: &'a DecodedRecord,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines to the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(
        &mut self,
        asset_type: &str,
        identity: &str,
        record: &DecodedRecord,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let line = Line {
            asset_type,
            name: identity,
            exported_at: at.to_rfc3339(),
            fields: record,
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> ExportSink for JsonLinesSink<W> {
    fn accept(&mut self, asset_type: &str, identity: &str, record: DecodedRecord) -> Result<()> {
        self.write_line(asset_type, identity, &record, Utc::now())
    }
}
