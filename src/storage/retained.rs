use chrono::{Days, Local, NaiveDate};

use super::grid::Grid;
use super::record::{Record, ScalarValue};
use super::table::TabularStore;
use super::{Error, StoreConfig, format_date, parse_date};

/// Outcome of one snapshot ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub date: String,
    /// Rows removed because they already carried today's date.
    pub replaced_rows: usize,
    pub appended_rows: usize,
}

/// Date-stamped snapshots on top of a [`TabularStore`].
///
/// Every ingested row carries the snapshot date in the configured date
/// column; that column is what same-day overwrite and pruning key on.
pub struct RetainedStore<G> {
    table: TabularStore<G>,
    config: StoreConfig,
}

impl<G: Grid> RetainedStore<G> {
    pub fn new(table: TabularStore<G>, config: StoreConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &TabularStore<G> {
        &self.table
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn date_column(&self) -> &str {
        &self.config.date_column
    }

    pub fn today(&self) -> NaiveDate {
        self.config
            .today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn today_string(&self) -> String {
        format_date(self.today())
    }

    /// Keeps only the allowlisted fields of `record`, in allowlist order.
    /// Allowlisted fields the record lacks come out empty.
    pub fn project(&self, record: &Record) -> Record {
        self.config
            .fields
            .iter()
            .map(|field| {
                let value = record.get(field).cloned().unwrap_or(ScalarValue::Null);
                (field.clone(), value)
            })
            .collect()
    }

    /// Appends `records` as today's snapshot. With `overwrite_today` any rows
    /// already stamped with today's date are removed first, so running the
    /// same ingest twice in a day leaves one copy.
    pub fn ingest_snapshot(
        &self,
        records: &[Record],
        overwrite_today: bool,
    ) -> Result<IngestStats, Error> {
        let today = self.today_string();

        let replaced_rows = if overwrite_today {
            self.table.delete_rows_where(self.date_column(), &today)?
        } else {
            0
        };

        let stamped: Vec<Record> = records
            .iter()
            .map(|record| {
                let mut projected = self.project(record);
                projected.insert(self.date_column(), today.as_str());
                projected
            })
            .collect();
        let appended_rows = self.table.append_records(&stamped)?;

        log::info!(
            "{}: snapshot {} replaced {} rows, appended {}",
            self.table.name(),
            today,
            replaced_rows,
            appended_rows
        );

        Ok(IngestStats {
            date: today,
            replaced_rows,
            appended_rows,
        })
    }

    /// Distinct values of the date column, first-seen order.
    pub fn snapshot_dates(&self) -> Result<Vec<String>, Error> {
        self.table.distinct_values(self.date_column())
    }

    /// Deletes snapshots dated strictly before today minus `days`. Cells that
    /// do not parse as a date are left alone. Returns the number of rows removed.
    pub fn prune_older_than(&self, days: u64) -> Result<usize, Error> {
        let Some(cutoff) = self.today().checked_sub_days(Days::new(days)) else {
            return Ok(0);
        };

        let mut deleted = 0;
        for value in self.snapshot_dates()? {
            match parse_date(&value) {
                Some(date) if date < cutoff => {
                    deleted += self.table.delete_rows_where(self.date_column(), &value)?;
                }
                Some(_) => {}
                None => log::warn!(
                    "{}: keeping rows with unparseable {} {:?}",
                    self.table.name(),
                    self.date_column(),
                    value
                ),
            }
        }

        if deleted > 0 {
            log::info!(
                "{}: pruned {} rows older than {}",
                self.table.name(),
                deleted,
                format_date(cutoff)
            );
        }
        Ok(deleted)
    }
}
