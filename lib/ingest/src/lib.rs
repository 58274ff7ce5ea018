//! Catalog ingestion
//!
//! Reads the catalog snapshot CSV and yields only complete rows. Lines that
//! do not parse as a record are skipped, and so are records with any of the
//! required columns missing or unparseable.

mod reader;
mod row;

pub use reader::{load_catalog, CatalogReader, IngestReport};
pub use row::{RawRow, NA_TOKENS, REQUIRED_COLUMNS};
