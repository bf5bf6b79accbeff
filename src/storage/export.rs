use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow_array::StringArray;

use super::grid::Grid;
use super::table::TabularStore;
use super::Error;

impl<G: Grid> TabularStore<G> {
    /// Every data row as one Arrow batch of Utf8 columns named after the header.
    pub fn to_record_batch(&self) -> Result<RecordBatch, Error> {
        let header = self.header()?;
        let schema = Arc::new(Schema::new(
            header
                .iter()
                .map(|name| Field::new(name, DataType::Utf8, false))
                .collect::<Vec<_>>(),
        ));

        let data_rows = self.data_row_count();
        if header.is_empty() || data_rows == 0 {
            return Ok(RecordBatch::new_empty(schema));
        }

        let block = self.grid().get_range(2, 1, data_rows, header.len())?;
        let columns: Vec<ArrayRef> = (0..header.len())
            .map(|col| {
                let values: Vec<&str> = block.iter().map(|row| row[col].as_str()).collect();
                Arc::new(StringArray::from(values)) as ArrayRef
            })
            .collect();

        Ok(RecordBatch::try_new(schema, columns)?)
    }
}
