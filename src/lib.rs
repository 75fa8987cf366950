#![doc(test(attr(deny(warnings))))]

//! Fincycle tracks personal finances in non-calendar financial months: it closes
//! elapsed months into a running balance, automates savings-goal contributions and
//! forecasts the next month's budget.

pub mod utils;

pub use fincycle_config as config;
pub use fincycle_core as engine;
pub use fincycle_domain as domain;
pub use fincycle_storage_json as storage;

pub use fincycle_config::EngineConfig;
pub use fincycle_core::{ClosingReport, CoreError, FinancialCycleEngine};
pub use fincycle_domain::{
    Category, FinancialMonth, ForecastResult, SavingGoal, Settings, SpecialDate, Transaction,
    YearMonth,
};

use std::path::Path;
use std::sync::Once;

use fincycle_core::SystemClock;
use fincycle_storage_json::{JsonSettingsStore, JsonTransactionStore};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Fincycle tracing initialized.");
    });
}

/// Engine over JSON files in `data_dir`, using the wall clock.
pub fn open_json_engine(
    data_dir: &Path,
    config: EngineConfig,
) -> Result<FinancialCycleEngine<JsonTransactionStore, JsonSettingsStore, SystemClock>, CoreError> {
    let (transactions, settings) = fincycle_storage_json::open_dir(data_dir)?;
    FinancialCycleEngine::with_system_clock(transactions, settings, config)
}
