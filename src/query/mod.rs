//! Computed columns derived from retained history.

use std::collections::HashMap;

use serde::Deserialize;

use crate::storage::{Error, Grid, RetainedStore, grid_row_batches};

#[cfg(test)]
mod tests;

/// A grouped row count to maintain as a column, e.g. "days spent in
/// stage X" per entity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricDefinition {
    /// Name of the computed column.
    pub name: String,
    pub source_field: String,
    /// A row counts when its `source_field` equals any of these.
    pub match_values: Vec<String>,
    /// Join key the counts are grouped by and written back against.
    pub group_by: String,
}

/// Result of one grouped count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCount {
    pub field: String,
    /// Matching rows per group key, across the whole retained history.
    pub counts: HashMap<String, usize>,
    /// Rows of the target snapshot whose computed cell was written.
    pub rows_written: usize,
}

/// Aggregate columns on top of a [`RetainedStore`].
pub struct MetricStore<G> {
    retained: RetainedStore<G>,
}

impl<G: Grid> MetricStore<G> {
    pub fn new(retained: RetainedStore<G>) -> Self {
        Self { retained }
    }

    pub fn retained(&self) -> &RetainedStore<G> {
        &self.retained
    }

    /// Counts history rows whose `source_field` is one of `match_values`,
    /// grouped by `group_by`, and writes each row of `snapshot_date` the count
    /// for its own key under `computed_field` (0 when the key never matched).
    ///
    /// Rows of other dates are not touched, and the column range for the
    /// date is rewritten in full, so repeating the call is harmless.
    pub fn compute_grouped_count<S: AsRef<str>>(
        &self,
        computed_field: &str,
        source_field: &str,
        match_values: &[S],
        group_by: &str,
        snapshot_date: &str,
    ) -> Result<GroupedCount, Error> {
        let table = self.retained.table();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in table.read_all_rows()? {
            let Some(value) = row.get(source_field) else {
                continue;
            };
            let value = value.to_cell();
            if match_values.iter().any(|m| m.as_ref() == value) {
                *counts.entry(row.cell(group_by)).or_insert(0) += 1;
            }
        }

        table.ensure_columns(&[computed_field])?;

        let mut result = GroupedCount {
            field: computed_field.to_string(),
            counts,
            rows_written: 0,
        };

        let (Some(key_column), Some(target_column)) = (
            table.column_position(group_by)?,
            table.column_position(computed_field)?,
        ) else {
            log::debug!(
                "{}: no {:?} column, skipping {}",
                table.name(),
                group_by,
                computed_field
            );
            return Ok(result);
        };

        let rows = table.find_rows_where(self.retained.date_column(), snapshot_date)?;
        let values: HashMap<String, String> = result
            .counts
            .iter()
            .map(|(key, count)| (key.clone(), count.to_string()))
            .collect();

        for (start, len) in grid_row_batches(&rows) {
            let block = table.lookup_column(start, len, key_column, &values, "0")?;
            table.grid().set_range(start, target_column, &block)?;
            result.rows_written += len;
        }

        log::debug!(
            "{}: {} written to {} rows for {}",
            table.name(),
            computed_field,
            result.rows_written,
            snapshot_date
        );
        Ok(result)
    }

    /// Runs every definition against `snapshot_date`, in order.
    pub fn compute_metrics(
        &self,
        definitions: &[MetricDefinition],
        snapshot_date: &str,
    ) -> Result<Vec<GroupedCount>, Error> {
        definitions
            .iter()
            .map(|def| {
                self.compute_grouped_count(
                    &def.name,
                    &def.source_field,
                    def.match_values.as_slice(),
                    &def.group_by,
                    snapshot_date,
                )
            })
            .collect()
    }
}
