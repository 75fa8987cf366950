#![allow(dead_code)]

use chrono::NaiveDate;
use fincycle::{engine::FixedClock, EngineConfig, FinancialCycleEngine, Transaction};
use fincycle_storage_json::{open_dir, JsonSettingsStore, JsonTransactionStore};
use std::path::Path;

pub type JsonEngine = FinancialCycleEngine<JsonTransactionStore, JsonSettingsStore, FixedClock>;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Engine over JSON files in `dir` with a pinned clock.
pub fn json_engine(dir: &Path, today: NaiveDate) -> JsonEngine {
    let (transactions, settings) = open_dir(dir).expect("open data dir");
    FinancialCycleEngine::new(
        transactions,
        settings,
        FixedClock::new(today),
        EngineConfig::default(),
    )
    .expect("engine")
}

/// 5000 income and 3000 living costs in each of Jan..=Mar 2024.
pub fn seed_flat_quarter(engine: &mut JsonEngine) {
    for m in 1..=3 {
        engine
            .add_transaction(Transaction::income(date(2024, m, 1), 5000.0, "Salary"))
            .expect("add income");
        engine
            .add_transaction(Transaction::expense(date(2024, m, 10), 3000.0, "Living"))
            .expect("add expense");
    }
}
