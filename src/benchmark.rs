use std::sync::Arc;
use std::time::Instant;

use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::query::{MetricDefinition, MetricStore};
use crate::storage::{MemoryGrid, Record, RetainedStore, StoreConfig, TabularStore};

const NUM_ENTITIES: usize = 2_000;
const NUM_DAYS: u64 = 30;
const RETENTION_DAYS: u64 = 14;
const STAGES: [&str; 4] = ["Lead", "Review", "Negotiation", "Closed"];

pub fn run_benchmarks() {
    println!(
        "Running benchmarks with {} entities over {} days...",
        NUM_ENTITIES, NUM_DAYS
    );

    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let grid = Arc::new(MemoryGrid::new());
    let metric = MetricDefinition {
        name: "Days In Review".into(),
        source_field: "Stage".into(),
        match_values: vec!["Review".into(), "Negotiation".into()],
        group_by: "Deal".into(),
    };

    let mut ingest_ms = 0.0;
    let mut metric_ms = 0.0;
    let mut prune_ms = 0.0;
    let mut pruned = 0;

    for day in 0..NUM_DAYS {
        let Some(today) = start_date.checked_add_days(Days::new(day)) else {
            break;
        };
        let store = MetricStore::new(RetainedStore::new(
            TabularStore::new("deals", grid.clone()),
            StoreConfig::new(["Deal", "Stage", "Owner"]).with_today(today),
        ));
        let records = generate_snapshot();

        let timer = Instant::now();
        let stats = match store.retained().ingest_snapshot(&records, true) {
            Ok(stats) => stats,
            Err(e) => {
                println!("Ingest failed on {}: {}", today, e);
                return;
            }
        };
        ingest_ms += timer.elapsed().as_secs_f64() * 1000.0;

        let timer = Instant::now();
        if let Err(e) = store.compute_metrics(std::slice::from_ref(&metric), &stats.date) {
            println!("Metric failed on {}: {}", today, e);
            return;
        }
        metric_ms += timer.elapsed().as_secs_f64() * 1000.0;

        let timer = Instant::now();
        match store.retained().prune_older_than(RETENTION_DAYS) {
            Ok(n) => pruned += n,
            Err(e) => {
                println!("Prune failed on {}: {}", today, e);
                return;
            }
        }
        prune_ms += timer.elapsed().as_secs_f64() * 1000.0;
    }

    println!("\nBenchmark Results:");
    println!("-----------------");
    println!("Ingest total: {:.2}ms", ingest_ms);
    println!("Metrics total: {:.2}ms", metric_ms);
    println!("Prune total: {:.2}ms ({} rows removed)", prune_ms, pruned);
    println!("Rows retained: {}", grid.rows().len().saturating_sub(1));
}

fn generate_snapshot() -> Vec<Record> {
    let mut rng = rand::rng();
    (0..NUM_ENTITIES)
        .map(|i| {
            Record::new()
                .with("Deal", format!("deal-{}", i))
                .with("Stage", STAGES[rng.random_range(0..STAGES.len())])
                .with("Owner", format!("owner-{}", i % 17))
                .with("Notes", "dropped on ingest")
        })
        .collect()
}
