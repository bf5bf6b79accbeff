use std::sync::Arc;

use super::Error;

/// Position of a single cell, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

/// Rectangular cell storage addressed by 1-indexed row and column.
///
/// Row 1 holds the header; every other row is data. Implementations take
/// `&self` and keep their own synchronization, so a store can hold a grid
/// while tests or other readers observe it through a shared handle.
pub trait Grid {
    fn get_cell(&self, row: usize, column: usize) -> Result<String, Error>;

    /// Writes `values` with its top-left corner at (`row`, `column`),
    /// growing the grid when the block reaches past the current edge.
    fn set_range(&self, row: usize, column: usize, values: &[Vec<String>]) -> Result<(), Error>;

    fn get_range(
        &self,
        row: usize,
        column: usize,
        height: usize,
        width: usize,
    ) -> Result<Vec<Vec<String>>, Error>;

    /// Number of rows in use, 0 when the grid is empty.
    fn last_row(&self) -> usize;

    fn last_column(&self) -> usize;

    /// Inserts one empty column to the right of `column` (0 inserts at the front).
    fn insert_column_after(&self, column: usize) -> Result<(), Error>;

    fn delete_rows(&self, start_row: usize, count: usize) -> Result<(), Error>;

    fn clear(&self) -> Result<(), Error>;

    /// Every cell whose full content equals `value`, in row-major order.
    fn find_exact_matches(&self, value: &str) -> Result<Vec<CellRef>, Error>;

    fn is_blank(&self) -> bool;
}

impl<G: Grid + ?Sized> Grid for Arc<G> {
    fn get_cell(&self, row: usize, column: usize) -> Result<String, Error> {
        (**self).get_cell(row, column)
    }

    fn set_range(&self, row: usize, column: usize, values: &[Vec<String>]) -> Result<(), Error> {
        (**self).set_range(row, column, values)
    }

    fn get_range(
        &self,
        row: usize,
        column: usize,
        height: usize,
        width: usize,
    ) -> Result<Vec<Vec<String>>, Error> {
        (**self).get_range(row, column, height, width)
    }

    fn last_row(&self) -> usize {
        (**self).last_row()
    }

    fn last_column(&self) -> usize {
        (**self).last_column()
    }

    fn insert_column_after(&self, column: usize) -> Result<(), Error> {
        (**self).insert_column_after(column)
    }

    fn delete_rows(&self, start_row: usize, count: usize) -> Result<(), Error> {
        (**self).delete_rows(start_row, count)
    }

    fn clear(&self) -> Result<(), Error> {
        (**self).clear()
    }

    fn find_exact_matches(&self, value: &str) -> Result<Vec<CellRef>, Error> {
        (**self).find_exact_matches(value)
    }

    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}
