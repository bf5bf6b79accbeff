/// A maximal run of consecutive row numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBatch {
    pub start: i64,
    pub len: usize,
}

impl RowBatch {
    pub fn end(&self) -> i64 {
        self.start + self.len as i64 - 1
    }
}

/// Splits `values` into runs where each value is the previous plus one.
/// Order is preserved; the input does not have to be sorted.
pub fn row_batches(values: &[i64]) -> Vec<RowBatch> {
    let mut batches: Vec<RowBatch> = Vec::new();

    for &value in values {
        match batches.last_mut() {
            Some(batch) if batch.end() + 1 == value => batch.len += 1,
            _ => batches.push(RowBatch { start: value, len: 1 }),
        }
    }

    batches
}

/// Same as [`row_batches`] for 1-indexed grid rows.
pub fn grid_row_batches(rows: &[usize]) -> Vec<(usize, usize)> {
    let values: Vec<i64> = rows.iter().map(|&r| r as i64).collect();
    row_batches(&values)
        .into_iter()
        .map(|b| (b.start as usize, b.len))
        .collect()
}
