use crate::row::{RawRow, REQUIRED_COLUMNS};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};
use wardrobe_core::{Error, Item, Result};

/// Outcome of reading a catalog snapshot
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub items: Vec<Item>,
    /// Records parsed from the file, complete or not
    pub rows_read: usize,
    /// Records dropped for a missing or unparseable required field
    pub rows_dropped: usize,
    /// Lines skipped because they did not parse as a record
    pub rows_malformed: usize,
}

/// Streaming reader over a styles CSV
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl CatalogReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CatalogReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        Self { reader }
    }

    /// Read every record, keeping only complete rows
    pub fn read(mut self) -> Result<IngestReport> {
        let headers = self
            .reader
            .headers()
            .map_err(|e| Error::Ingest(e.to_string()))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::Ingest(format!("missing column: {}", column)));
            }
        }

        let mut report = IngestReport {
            items: Vec::new(),
            rows_read: 0,
            rows_dropped: 0,
            rows_malformed: 0,
        };

        for record in self.reader.deserialize::<RawRow>() {
            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    debug!("Skipping malformed line: {}", e);
                    report.rows_malformed += 1;
                    continue;
                }
            };

            report.rows_read += 1;
            match row.into_item() {
                Some(item) => report.items.push(item),
                None => report.rows_dropped += 1,
            }
        }

        info!(
            "Read {} rows: {} kept, {} incomplete, {} malformed",
            report.rows_read,
            report.items.len(),
            report.rows_dropped,
            report.rows_malformed
        );
        Ok(report)
    }
}

/// Read the catalog at `path` and return its complete rows
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Item>> {
    CatalogReader::from_path(path)?.read().map(|report| report.items)
}
