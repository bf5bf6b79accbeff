use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use parking_lot::RwLock;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

use super::grid::{CellRef, Grid};
use super::Error;

/// In-memory grid backed by a rectangular `Vec<Vec<String>>`.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    state: RwLock<GridState>,
}

#[derive(Debug, Default)]
struct GridState {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl GridState {
    fn grow(&mut self, height: usize, width: usize) {
        if width > self.width {
            for row in &mut self.rows {
                row.resize(width, String::new());
            }
            self.width = width;
        }
        while self.rows.len() < height {
            self.rows.push(vec![String::new(); self.width]);
        }
    }
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from rows, padding short rows with empty cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(|c| c.as_ref().to_string()).collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();

        Self {
            state: RwLock::new(GridState { rows, width }),
        }
    }

    /// Copy of every row, header included.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.state.read().rows.clone()
    }

    /// Writes the grid to an Arrow IPC file: the header becomes the schema,
    /// data rows become one Utf8 batch. The file is written under a temporary
    /// name and renamed into place.
    pub fn save_ipc(&self, path: &Path) -> Result<(), Error> {
        let (schema, batch) = {
            let state = self.state.read();
            let header: Vec<&str> = state
                .rows
                .first()
                .map(|row| row.iter().map(String::as_str).collect())
                .unwrap_or_default();

            let schema = Arc::new(Schema::new(
                header
                    .iter()
                    .map(|name| Field::new(*name, DataType::Utf8, false))
                    .collect::<Vec<_>>(),
            ));

            let data = state.rows.get(1..).unwrap_or_default();
            let batch = if data.is_empty() {
                None
            } else {
                let columns: Vec<ArrayRef> = (0..header.len())
                    .map(|col| {
                        let values: Vec<&str> = data.iter().map(|row| row[col].as_str()).collect();
                        Arc::new(StringArray::from(values)) as ArrayRef
                    })
                    .collect();
                Some(RecordBatch::try_new(schema.clone(), columns)?)
            };
            (schema, batch)
        };

        let file_name = path
            .file_name()
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "grid path has no file name")
            })?
            .to_string_lossy()
            .into_owned();
        let temp_path = path.with_file_name(format!("{}.{}.tmp", file_name, random_suffix(10)));

        let file = std::fs::File::create(&temp_path)?;
        let mut writer = FileWriter::try_new(file, &schema)?;
        if let Some(batch) = &batch {
            writer.write(batch)?;
        }
        writer.finish()?;
        std::fs::rename(&temp_path, path)?;

        log::debug!("saved grid with {} columns to {}", schema.fields().len(), path.display());
        Ok(())
    }

    /// Reads a grid previously written by [`MemoryGrid::save_ipc`].
    pub fn load_ipc(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        let reader = FileReader::try_new(file, None)?;
        let schema = reader.schema();

        let mut rows: Vec<Vec<String>> = Vec::new();
        if !schema.fields().is_empty() {
            rows.push(schema.fields().iter().map(|f| f.name().clone()).collect());
        }

        for maybe_batch in reader {
            let batch = maybe_batch?;
            let columns = batch
                .columns()
                .iter()
                .enumerate()
                .map(|(idx, col)| {
                    col.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
                        Error::Grid(format!("column {} of {} is not Utf8", idx + 1, path.display()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            for row in 0..batch.num_rows() {
                rows.push(
                    columns
                        .iter()
                        .map(|col| {
                            if col.is_null(row) {
                                String::new()
                            } else {
                                col.value(row).to_string()
                            }
                        })
                        .collect(),
                );
            }
        }

        Ok(Self::from_rows(&rows))
    }
}

impl Grid for MemoryGrid {
    fn get_cell(&self, row: usize, column: usize) -> Result<String, Error> {
        if row == 0 || column == 0 {
            return Err(Error::OutOfBounds(format!("cell ({}, {})", row, column)));
        }
        let state = self.state.read();
        Ok(state
            .rows
            .get(row - 1)
            .and_then(|r| r.get(column - 1))
            .cloned()
            .unwrap_or_default())
    }

    fn set_range(&self, row: usize, column: usize, values: &[Vec<String>]) -> Result<(), Error> {
        if row == 0 || column == 0 {
            return Err(Error::OutOfBounds(format!("range at ({}, {})", row, column)));
        }
        let width = values.first().map(Vec::len).unwrap_or(0);
        if values.iter().any(|r| r.len() != width) {
            return Err(Error::RaggedRange(format!(
                "{} rows starting at ({}, {}) differ in width",
                values.len(),
                row,
                column
            )));
        }
        if width == 0 {
            return Ok(());
        }

        let mut state = self.state.write();
        state.grow(row - 1 + values.len(), column - 1 + width);
        for (offset, cells) in values.iter().enumerate() {
            let target = &mut state.rows[row - 1 + offset][column - 1..column - 1 + width];
            target.clone_from_slice(cells);
        }
        Ok(())
    }

    fn get_range(
        &self,
        row: usize,
        column: usize,
        height: usize,
        width: usize,
    ) -> Result<Vec<Vec<String>>, Error> {
        if row == 0 || column == 0 {
            return Err(Error::OutOfBounds(format!("range at ({}, {})", row, column)));
        }
        let state = self.state.read();
        Ok((row - 1..row - 1 + height)
            .map(|r| {
                (column - 1..column - 1 + width)
                    .map(|c| {
                        state
                            .rows
                            .get(r)
                            .and_then(|cells| cells.get(c))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect())
    }

    fn last_row(&self) -> usize {
        self.state.read().rows.len()
    }

    fn last_column(&self) -> usize {
        self.state.read().width
    }

    fn insert_column_after(&self, column: usize) -> Result<(), Error> {
        let mut state = self.state.write();
        if column > state.width {
            return Err(Error::OutOfBounds(format!(
                "cannot insert after column {} of {}",
                column, state.width
            )));
        }
        for row in &mut state.rows {
            row.insert(column, String::new());
        }
        state.width += 1;
        Ok(())
    }

    fn delete_rows(&self, start_row: usize, count: usize) -> Result<(), Error> {
        let mut state = self.state.write();
        if start_row == 0 || start_row - 1 + count > state.rows.len() {
            return Err(Error::OutOfBounds(format!(
                "rows {}..{} of {}",
                start_row,
                start_row + count,
                state.rows.len()
            )));
        }
        state.rows.drain(start_row - 1..start_row - 1 + count);
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut state = self.state.write();
        state.rows.clear();
        state.width = 0;
        Ok(())
    }

    fn find_exact_matches(&self, value: &str) -> Result<Vec<CellRef>, Error> {
        let state = self.state.read();
        let mut found = Vec::new();
        for (r, cells) in state.rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                if cell == value {
                    found.push(CellRef { row: r + 1, column: c + 1 });
                }
            }
        }
        Ok(found)
    }

    fn is_blank(&self) -> bool {
        self.state
            .read()
            .rows
            .iter()
            .all(|row| row.iter().all(String::is_empty))
    }
}

fn random_suffix(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
