//! fincycle-core
//!
//! Financial cycle and budget forecasting logic.
//! Depends on fincycle-domain. No terminal I/O, no direct storage interactions:
//! persistence goes through the [`storage`] traits.

pub mod aggregation_service;
pub mod closing_service;
pub mod engine;
pub mod error;
pub mod financial_month;
pub mod forecast_service;
pub mod savings_service;
pub mod special_date_service;
pub mod storage;
pub mod time;
pub mod transaction_service;

pub use aggregation_service::*;
pub use closing_service::*;
pub use engine::FinancialCycleEngine;
pub use error::CoreError;
pub use financial_month::FinancialMonthCalculator;
pub use forecast_service::*;
pub use savings_service::*;
pub use special_date_service::*;
pub use storage::{MemorySettingsStore, MemoryTransactionStore, SettingsStore, TransactionStore};
pub use time::{Clock, FixedClock, SystemClock};
pub use transaction_service::*;

#[cfg(test)]
mod tests;
