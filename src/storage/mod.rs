//! Spreadsheet-backed storage: a header-driven table over a positional grid

use std::io;

use chrono::NaiveDate;

mod batch;
mod export;
mod grid;
mod memory_grid;
mod record;
mod retained;
mod table;

#[cfg(test)]
mod tests;

pub use batch::{RowBatch, grid_row_batches, row_batches};
pub use grid::{CellRef, Grid};
pub use memory_grid::MemoryGrid;
pub use record::{Record, ScalarValue, header_union};
pub use retained::{IngestStats, RetainedStore};
pub use table::TabularStore;

/// Column stamped with the snapshot date unless configured otherwise.
pub const DEFAULT_DATE_COLUMN: &str = "Backup Date";

/// Format of every value in the retention-date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Common error type for storage operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Range out of bounds: {0}")]
    OutOfBounds(String),
    #[error("Ragged range: {0}")]
    RaggedRange(String),
    #[error("Grid error: {0}")]
    Grid(String),
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Configuration for a retained store
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Fields copied from each source record; everything else is dropped.
    pub fields: Vec<String>,
    pub date_column: String,
    /// Pins "today" instead of reading the local clock.
    pub today: Option<NaiveDate>,
}

impl StoreConfig {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            today: None,
        }
    }

    pub fn with_date_column(mut self, date_column: impl Into<String>) -> Self {
        self.date_column = date_column.into();
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}
