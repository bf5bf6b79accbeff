//! Drives one table through fetch, snapshot ingest, metrics and pruning.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::{BackupConfig, TableConfig};
use crate::query::MetricStore;
use crate::storage::{self, Grid, Record, RetainedStore, TabularStore};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Source error: {0}")]
    Source(String),
    #[error("Storage error: {0}")]
    Storage(#[from] storage::Error),
}

/// Remote table reader. Implementations handle paging and backoff and only
/// return once every page is in.
pub trait DataSource {
    fn fetch_all(&self, source: &str, view_id: &str) -> Result<Vec<Record>, PipelineError>;
}

/// Serves fixed records per table name.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    tables: HashMap<String, Vec<Record>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, records: Vec<Record>) {
        self.tables.insert(source.into(), records);
    }

    /// Parses `{"table": [{...}, ...], ...}`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            tables: serde_json::from_str(json)?,
        })
    }
}

impl DataSource for StaticSource {
    fn fetch_all(&self, source: &str, _view_id: &str) -> Result<Vec<Record>, PipelineError> {
        self.tables
            .get(source)
            .cloned()
            .ok_or_else(|| PipelineError::Source(format!("unknown table {:?}", source)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    pub table: String,
    pub date: String,
    pub fetched: usize,
    pub replaced: usize,
    pub appended: usize,
    pub pruned: usize,
    pub metrics: Vec<String>,
}

/// Backs up one table into `grid`. `today` pins the snapshot date.
pub fn backup_table<S, G>(
    source: &S,
    grid: G,
    table: &TableConfig,
    today: Option<NaiveDate>,
) -> Result<BackupReport, PipelineError>
where
    S: DataSource + ?Sized,
    G: Grid,
{
    let records = source.fetch_all(&table.name, &table.view_id).map_err(|e| {
        log::error!("{}: fetch failed: {}", table.name, e);
        e
    })?;
    log::info!("{}: fetched {} records", table.name, records.len());

    let store = MetricStore::new(RetainedStore::new(
        TabularStore::new(table.name.clone(), grid),
        table.store_config(today),
    ));

    let run = || -> Result<BackupReport, storage::Error> {
        let retained = store.retained();
        let stats = retained.ingest_snapshot(&records, table.overwrite_today)?;
        let metrics = store
            .compute_metrics(&table.metrics, &stats.date)?
            .into_iter()
            .map(|m| m.field)
            .collect();
        let pruned = match table.retention_days {
            Some(days) => retained.prune_older_than(days)?,
            None => 0,
        };

        Ok(BackupReport {
            table: table.name.clone(),
            date: stats.date,
            fetched: records.len(),
            replaced: stats.replaced_rows,
            appended: stats.appended_rows,
            pruned,
            metrics,
        })
    };

    run().map_err(|e| {
        log::error!("{}: backup failed: {}", table.name, e);
        PipelineError::from(e)
    })
}

/// Backs up every configured table, asking `grid_for` for each table's grid.
/// Stops at the first failure.
pub fn backup_all<S, G, F>(
    source: &S,
    config: &BackupConfig,
    today: Option<NaiveDate>,
    mut grid_for: F,
) -> Result<Vec<BackupReport>, PipelineError>
where
    S: DataSource + ?Sized,
    G: Grid,
    F: FnMut(&TableConfig) -> G,
{
    config
        .tables
        .iter()
        .map(|table| backup_table(source, grid_for(table), table, today))
        .collect()
}
