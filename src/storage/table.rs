use std::collections::HashMap;

use super::batch::grid_row_batches;
use super::grid::Grid;
use super::record::{Record, header_union};
use super::Error;

/// One named grid treated as a table: row 1 is the header, every other row a
/// record aligned to it.
///
/// Fields missing from the header are never an error. Lookups against them
/// come back empty and mutations keyed on them do nothing, which lets the
/// retention and metric layers run against a store that has not seen a
/// given column yet.
pub struct TabularStore<G> {
    name: String,
    grid: G,
}

impl<G: Grid> TabularStore<G> {
    pub fn new(name: impl Into<String>, grid: G) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn data_row_count(&self) -> usize {
        self.grid.last_row().saturating_sub(1)
    }

    pub fn header(&self) -> Result<Vec<String>, Error> {
        let width = self.grid.last_column();
        if width == 0 || self.grid.last_row() == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .grid
            .get_range(1, 1, 1, width)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    /// 1-indexed column of the first header cell named `field`, `None` when absent.
    pub fn column_position(&self, field: &str) -> Result<Option<usize>, Error> {
        Ok(self
            .header()?
            .iter()
            .position(|name| name == field)
            .map(|idx| idx + 1))
    }

    /// Appends a column for every field the header does not have yet.
    pub fn ensure_columns<S: AsRef<str>>(&self, fields: &[S]) -> Result<(), Error> {
        if self.grid.is_blank() {
            let mut names: Vec<String> = Vec::new();
            for field in fields {
                if !names.iter().any(|n| n == field.as_ref()) {
                    names.push(field.as_ref().to_string());
                }
            }
            if !names.is_empty() {
                log::debug!("{}: writing initial header of {} columns", self.name, names.len());
                self.grid.set_range(1, 1, &[names])?;
            }
            return Ok(());
        }

        let mut header = self.header()?;
        for field in fields {
            let field = field.as_ref();
            if header.iter().any(|name| name == field) {
                continue;
            }
            let after = header.len();
            self.grid.insert_column_after(after)?;
            self.grid.set_range(1, after + 1, &[vec![field.to_string()]])?;
            log::debug!("{}: added column {:?} at {}", self.name, field, after + 1);
            header.push(field.to_string());
        }
        Ok(())
    }

    /// Data rows whose `field` cell equals `value` exactly, ascending.
    pub fn find_rows_where(&self, field: &str, value: &str) -> Result<Vec<usize>, Error> {
        let Some(column) = self.column_position(field)? else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<usize> = self
            .grid
            .find_exact_matches(value)?
            .into_iter()
            .filter(|cell| cell.column == column && cell.row >= 2)
            .map(|cell| cell.row)
            .collect();
        rows.sort_unstable();
        rows.dedup();
        Ok(rows)
    }

    /// Deletes every row found by [`TabularStore::find_rows_where`] and returns
    /// how many went. Runs are removed bottom-up so the row numbers of runs not
    /// yet processed stay valid.
    pub fn delete_rows_where(&self, field: &str, value: &str) -> Result<usize, Error> {
        let rows = self.find_rows_where(field, value)?;
        if rows.is_empty() {
            return Ok(0);
        }

        for (start, len) in grid_row_batches(&rows).into_iter().rev() {
            log::debug!("{}: deleting rows {}..{}", self.name, start, start + len - 1);
            self.grid.delete_rows(start, len)?;
        }
        Ok(rows.len())
    }

    /// Writes `records` below the existing data in one block, adding any
    /// columns they introduce first.
    pub fn append_records(&self, records: &[Record]) -> Result<usize, Error> {
        if records.is_empty() {
            return Ok(0);
        }

        self.ensure_columns(header_union(records).as_slice())?;
        let header = self.header()?;
        if header.is_empty() {
            return Ok(0);
        }

        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| header.iter().map(|name| record.cell(name)).collect())
            .collect();

        let start = self.grid.last_row() + 1;
        self.grid.set_range(start, 1, &rows)?;
        Ok(rows.len())
    }

    /// Drops everything in the grid, header included, then appends `records`.
    pub fn replace_records(&self, records: &[Record]) -> Result<usize, Error> {
        self.grid.clear()?;
        self.append_records(records)
    }

    /// Every data row keyed by header name. With duplicate header names only
    /// the first column is kept.
    pub fn read_all_rows(&self) -> Result<Vec<Record>, Error> {
        let header = self.header()?;
        let data_rows = self.data_row_count();
        if header.is_empty() || data_rows == 0 {
            return Ok(Vec::new());
        }

        let block = self.grid.get_range(2, 1, data_rows, header.len())?;
        Ok(block
            .into_iter()
            .map(|cells| {
                let mut record = Record::new();
                for (name, value) in header.iter().zip(cells) {
                    if !record.contains(name) {
                        record.insert(name.clone(), value);
                    }
                }
                record
            })
            .collect())
    }

    /// Distinct values under `field` in the order they first appear.
    pub fn distinct_values(&self, field: &str) -> Result<Vec<String>, Error> {
        let Some(column) = self.column_position(field)? else {
            return Ok(Vec::new());
        };
        let data_rows = self.data_row_count();
        if data_rows == 0 {
            return Ok(Vec::new());
        }

        let mut values: Vec<String> = Vec::new();
        for row in self.grid.get_range(2, column, data_rows, 1)? {
            if let Some(value) = row.into_iter().next() {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        Ok(values)
    }

    pub fn cell(&self, row: usize, field: &str) -> Result<Option<String>, Error> {
        match self.column_position(field)? {
            Some(column) => Ok(Some(self.grid.get_cell(row, column)?)),
            None => Ok(None),
        }
    }

    /// Reads the key in `key_column` for each of `row_count` rows from
    /// `start_row` and maps it through `values`, falling back to `default`.
    /// The result is a single-column block ready for `Grid::set_range`.
    pub fn lookup_column(
        &self,
        start_row: usize,
        row_count: usize,
        key_column: usize,
        values: &HashMap<String, String>,
        default: &str,
    ) -> Result<Vec<Vec<String>>, Error> {
        if row_count == 0 {
            return Ok(Vec::new());
        }

        Ok(self
            .grid
            .get_range(start_row, key_column, row_count, 1)?
            .into_iter()
            .map(|row| {
                let key = row.into_iter().next().unwrap_or_default();
                vec![values.get(&key).cloned().unwrap_or_else(|| default.to_string())]
            })
            .collect())
    }
}
