//! Single-owner facade tying the services to persistence and the clock.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use fincycle_config::EngineConfig;
use fincycle_domain::{Category, FinancialMonth, ForecastResult, Settings, Transaction, YearMonth};

use crate::{
    aggregation_service::{AggregationService, Totals},
    closing_service::{ClosingOptions, ClosingReport, ClosingService},
    financial_month::FinancialMonthCalculator,
    forecast_service::{ForecastOptions, ForecastService},
    savings_service::SavingsService,
    storage::{SettingsStore, TransactionStore},
    time::{Clock, SystemClock},
    transaction_service::TransactionService,
    CoreError,
};

/// Owns the working [`Settings`] and drives every engine operation against the
/// injected stores.
///
/// Operations run synchronously on the caller's thread. The engine is the single
/// writer of its settings; callers must not run two operations concurrently against
/// the same stores.
///
/// When a save fails the error is returned as-is and in-memory changes (goal
/// progress, watermark, balance) are kept. A transaction set that could not be
/// written is held on the engine: reads see it, the next write flushes it first,
/// and [`Self::retry_save`] persists it together with the settings.
pub struct FinancialCycleEngine<T, S, C = SystemClock>
where
    T: TransactionStore,
    S: SettingsStore,
    C: Clock,
{
    transactions: T,
    settings_store: S,
    clock: C,
    config: EngineConfig,
    settings: Settings,
    unsaved_transactions: Option<Vec<Transaction>>,
}

impl<T, S> FinancialCycleEngine<T, S, SystemClock>
where
    T: TransactionStore,
    S: SettingsStore,
{
    pub fn with_system_clock(transactions: T, settings_store: S, config: EngineConfig) -> Result<Self, CoreError> {
        Self::new(transactions, settings_store, SystemClock, config)
    }
}

impl<T, S, C> FinancialCycleEngine<T, S, C>
where
    T: TransactionStore,
    S: SettingsStore,
    C: Clock,
{
    /// Loads and validates settings from `settings_store`.
    pub fn new(transactions: T, settings_store: S, clock: C, config: EngineConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let settings = settings_store.load()?;
        settings.validate()?;
        Ok(Self {
            transactions,
            settings_store,
            clock,
            config,
            settings,
            unsaved_transactions: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Direct access for user edits; call [`Self::save_settings`] afterwards.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transaction_store(&self) -> &T {
        &self.transactions
    }

    pub fn settings_store(&self) -> &S {
        &self.settings_store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn savings_category(&self) -> Category {
        Category::new(&self.config.savings_category)
    }

    pub fn save_settings(&self) -> Result<(), CoreError> {
        self.settings_store.save(&self.settings).map_err(|err| {
            warn!(error = %err, "failed to persist settings");
            err
        })
    }

    /// The working transaction set: the unsaved one if a previous write failed,
    /// otherwise whatever the store holds.
    pub fn load_transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        match &self.unsaved_transactions {
            Some(unsaved) => Ok(unsaved.clone()),
            None => self.transactions.load_all(),
        }
    }

    pub fn has_unsaved_transactions(&self) -> bool {
        self.unsaved_transactions.is_some()
    }

    /// Writes any transactions held back by an earlier failure, then the settings.
    pub fn retry_save(&mut self) -> Result<(), CoreError> {
        self.flush_unsaved_transactions()?;
        self.save_settings()
    }

    fn flush_unsaved_transactions(&mut self) -> Result<(), CoreError> {
        match self.unsaved_transactions.take() {
            Some(unsaved) => self.save_transactions(unsaved),
            None => Ok(()),
        }
    }

    fn save_transactions(&mut self, transactions: Vec<Transaction>) -> Result<(), CoreError> {
        match self.transactions.save_all(&transactions) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(error = %err, count = transactions.len(), "failed to persist transactions");
                self.unsaved_transactions = Some(transactions);
                Err(err)
            }
        }
    }

    pub fn current_financial_month(&self) -> FinancialMonth {
        FinancialMonthCalculator::current_range(self.today(), self.settings.month_start_day())
    }

    pub fn financial_month(&self, month: YearMonth) -> FinancialMonth {
        FinancialMonthCalculator::for_month(month, self.settings.month_start_day())
    }

    pub fn month_summary(&self, month: YearMonth) -> Result<Totals, CoreError> {
        let transactions = self.load_transactions()?;
        Ok(AggregationService::totals_for_month(
            &transactions,
            &self.financial_month(month),
        ))
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid, CoreError> {
        let mut transactions = self.load_transactions()?;
        let id = TransactionService::add(&mut transactions, transaction)?;
        self.unsaved_transactions = None;
        self.save_transactions(transactions)?;
        Ok(id)
    }

    pub fn update_transaction(&mut self, replacement: Transaction) -> Result<(), CoreError> {
        let mut transactions = self.load_transactions()?;
        TransactionService::update(&mut transactions, replacement)?;
        self.unsaved_transactions = None;
        self.save_transactions(transactions)
    }

    /// Day of the month on which a goal's contribution is expected. Closing books
    /// on the financial month's start, manual runs on the configured day.
    fn contribution_day(&self) -> u32 {
        if self.config.apply_contributions_on_close {
            self.settings.month_start_day()
        } else {
            self.config.contribution_day
        }
    }

    fn forecast_options(&self, window_months: u32) -> Result<ForecastOptions, CoreError> {
        if window_months == 0 {
            return Err(CoreError::Validation(
                "forecast window must cover at least one month".into(),
            ));
        }
        Ok(ForecastOptions {
            window_months,
            savings_category: self.savings_category(),
            contribution_day: self.contribution_day(),
        })
    }

    /// Closes every fully elapsed financial month after the watermark.
    pub fn close_months(&mut self) -> Result<Option<ClosingReport>, CoreError> {
        let options = ClosingOptions {
            forecast: self.forecast_options(self.config.closing_forecast_window_months)?,
            apply_contributions: self.config.apply_contributions_on_close,
        };
        self.flush_unsaved_transactions()?;
        let mut transactions = self.load_transactions()?;
        let today = self.today();
        let Some(report) = ClosingService::close(&mut self.settings, &mut transactions, today, &options)?
        else {
            return Ok(None);
        };
        if report.transactions_changed() {
            self.save_transactions(transactions)?;
        }
        self.save_settings()?;
        Ok(Some(report))
    }

    /// `Ok(true)` when at least one month was closed, `Ok(false)` when nothing was eligible.
    pub fn perform_month_end_closing(&mut self) -> Result<bool, CoreError> {
        Ok(self.close_months()?.is_some())
    }

    /// The month a "next month" forecast targets: the one after the watermark, or the
    /// financial month in progress when nothing has been closed yet.
    pub fn forecast_target(&self) -> YearMonth {
        match self.settings.last_month_closed() {
            Some(month) => month.next(),
            None => self.current_financial_month().period,
        }
    }

    pub fn forecast_next_month_budget(&self, window_months: u32) -> Result<ForecastResult, CoreError> {
        self.forecast_for_month(self.forecast_target(), window_months)
    }

    /// Full analysis using the configured analysis window.
    pub fn analyze_next_month(&self) -> Result<ForecastResult, CoreError> {
        self.forecast_next_month_budget(self.config.analysis_window_months)
    }

    pub fn forecast_for_month(&self, target: YearMonth, window_months: u32) -> Result<ForecastResult, CoreError> {
        let options = self.forecast_options(window_months)?;
        let transactions = self.load_transactions()?;
        Ok(ForecastService::forecast(
            &transactions,
            &self.settings,
            target,
            &options,
        ))
    }

    /// Makes `forecast.final_budget` the new monthly baseline and persists settings.
    pub fn save_forecast(&mut self, forecast: &ForecastResult) -> Result<(), CoreError> {
        ForecastService::save_forecast(&mut self.settings, forecast)?;
        self.save_settings()
    }

    /// Books contributions for `target`. Returns `Ok(false)` if no goal contributed.
    ///
    /// Nothing here records which months were processed: calling twice for the same
    /// month contributes twice.
    pub fn process_monthly_savings_contributions(
        &mut self,
        target: YearMonth,
        day: u32,
        category: &Category,
    ) -> Result<bool, CoreError> {
        self.flush_unsaved_transactions()?;
        let mut transactions = self.load_transactions()?;
        let applied = SavingsService::process(
            &mut self.settings.saving_goals,
            &mut transactions,
            target,
            day,
            category,
        );
        if applied.is_empty() {
            return Ok(false);
        }
        self.settings.expense_categories.register(category.clone());
        info!(
            month = %target,
            goals = applied.len(),
            total = applied.iter().fold(0.0, |total, c| total + c.amount),
            "savings contributions booked"
        );
        self.save_transactions(transactions)?;
        self.save_settings()?;
        Ok(true)
    }
}
