pub mod basic;

use super::*;
use chrono::NaiveDate;
use std::sync::Arc;

pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn shared_store(name: &str) -> (Arc<MemoryGrid>, TabularStore<Arc<MemoryGrid>>) {
    let grid = Arc::new(MemoryGrid::new());
    let store = TabularStore::new(name, grid.clone());
    (grid, store)
}

pub fn store_from_rows(rows: &[Vec<&str>]) -> (Arc<MemoryGrid>, TabularStore<Arc<MemoryGrid>>) {
    let grid = Arc::new(MemoryGrid::from_rows(rows));
    let store = TabularStore::new("test", grid.clone());
    (grid, store)
}

pub fn test_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn test_config(today: NaiveDate) -> StoreConfig {
    StoreConfig::new(["id", "status"]).with_today(today)
}
