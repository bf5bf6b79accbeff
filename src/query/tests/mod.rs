use std::sync::Arc;

use chrono::NaiveDate;


use crate::query::{MetricDefinition, MetricStore};
use crate::storage::{MemoryGrid, Record, RetainedStore, StoreConfig, TabularStore};

fn create_metric_store(rows: &[Vec<&str>]) -> (Arc<MemoryGrid>, MetricStore<Arc<MemoryGrid>>) {
    let grid = Arc::new(MemoryGrid::from_rows(rows));
    let config = StoreConfig::new(["Deal", "Stage"])
        .with_today(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let store = MetricStore::new(RetainedStore::new(
        TabularStore::new("deals", grid.clone()),
        config,
    ));
    (grid, store)
}

/// Three days of history: "a" sat in Review twice, "b" once, "c" never.
fn history() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Deal", "Stage", "Backup Date"],
        vec!["a", "Review", "2024-06-01"],
        vec!["b", "Draft", "2024-06-01"],
        vec!["a", "Review", "2024-06-02"],
        vec!["b", "Review", "2024-06-02"],
        vec!["a", "Signed", "2024-06-03"],
        vec!["b", "Review", "2024-06-03"],
        vec!["c", "Draft", "2024-06-03"],
    ]
}

fn column(grid: &MemoryGrid, idx: usize) -> Vec<String> {
    grid.rows().into_iter().skip(1).map(|row| row[idx].clone()).collect()
}

fn review_metric() -> MetricDefinition {
    MetricDefinition {
        name: "Days In Review".into(),
        source_field: "Stage".into(),
        match_values: vec!["Review".into()],
        group_by: "Deal".into(),
    }
}

fn deal(name: &str, stage: &str) -> Record {
    Record::new().with("Deal", name).with("Stage", stage)
}
