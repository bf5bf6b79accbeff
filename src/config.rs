//! Per-table backup configuration, loaded once at start-up and passed down.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::query::MetricDefinition;
use crate::storage::{DEFAULT_DATE_COLUMN, StoreConfig};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackupConfig {
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    /// Source table name; also names the backing grid.
    pub name: String,
    #[serde(default)]
    pub view_id: String,
    /// Allowlist of fields copied on every snapshot.
    pub fields: Vec<String>,
    /// Snapshots older than this many days are pruned. `None` keeps everything.
    #[serde(default)]
    pub retention_days: Option<u64>,
    #[serde(default)]
    pub date_column: Option<String>,
    #[serde(default = "default_overwrite_today")]
    pub overwrite_today: bool,
    #[serde(default)]
    pub metrics: Vec<MetricDefinition>,
}

fn default_overwrite_today() -> bool {
    true
}

impl TableConfig {
    pub fn date_column(&self) -> &str {
        self.date_column.as_deref().unwrap_or(DEFAULT_DATE_COLUMN)
    }

    pub fn store_config(&self, today: Option<NaiveDate>) -> StoreConfig {
        let mut config = StoreConfig::new(self.fields.iter().cloned())
            .with_date_column(self.date_column());
        config.today = today;
        config
    }
}

impl BackupConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BackupConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn table(&self, name: &str) -> Option<&TableConfig> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(ConfigError::Invalid("table name must not be empty".into()));
            }
            if !seen.insert(table.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate table {:?}", table.name)));
            }
            if table.fields.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "table {:?} retains no fields",
                    table.name
                )));
            }
            for metric in &table.metrics {
                for field in [&metric.source_field, &metric.group_by] {
                    if !table.fields.contains(field) {
                        return Err(ConfigError::Invalid(format!(
                            "metric {:?} of table {:?} reads {:?}, which is not retained",
                            metric.name, table.name, field
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
