//! Periodic snapshots of remote tables into spreadsheet-style grids, with
//! date-based retention and per-entity counts derived from the kept history.

pub mod benchmark;
pub mod config;
pub mod pipeline;
pub mod query;
pub mod storage;
