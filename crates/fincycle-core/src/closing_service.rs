//! Month-end closing: walks fully elapsed financial months in order, exactly once each.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use fincycle_domain::{
    FinancialMonth, ForecastResult, Settings, SettingsError, Transaction, YearMonth,
};

use crate::{
    aggregation_service::{AggregationService, Totals},
    financial_month::FinancialMonthCalculator,
    forecast_service::{ForecastOptions, ForecastService},
    savings_service::{Contribution, SavingsService},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ClosingOptions {
    /// Forecast parameters used to seed the next month's budget.
    pub forecast: ForecastOptions,
    /// Book savings contributions for each newly closed month before totalling it.
    pub apply_contributions: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedMonth {
    pub month: FinancialMonth,
    pub totals: Totals,
    /// `income - expense`; zero for months without transactions.
    pub surplus: f64,
}

#[derive(Debug, Clone, PartialEq)]
/// Everything a closing run changed.
pub struct ClosingReport {
    pub months: Vec<ClosedMonth>,
    pub contributions: Vec<Contribution>,
    pub total_surplus: f64,
    pub balance: f64,
    pub watermark: YearMonth,
    pub forecast: ForecastResult,
}

impl ClosingReport {
    pub fn transactions_changed(&self) -> bool {
        !self.contributions.is_empty()
    }
}

/// Lifecycle of the closing watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingState {
    Unclosed,
    ClosedThrough(YearMonth),
}

impl ClosingState {
    pub fn of(settings: &Settings) -> Self {
        match settings.last_month_closed() {
            Some(month) => ClosingState::ClosedThrough(month),
            None => ClosingState::Unclosed,
        }
    }
}

pub struct ClosingService;

impl ClosingService {
    /// The next month's goals are counted on the date the next closing will book
    /// them: the financial month's start.
    fn forecast_options(settings: &Settings, options: &ClosingOptions) -> ForecastOptions {
        if !options.apply_contributions {
            return options.forecast.clone();
        }
        ForecastOptions {
            contribution_day: settings.month_start_day(),
            ..options.forecast.clone()
        }
    }

    /// First month a closing run would examine, or `None` when there is neither a
    /// watermark nor any transaction to start from.
    pub fn first_candidate(settings: &Settings, transactions: &[Transaction]) -> Option<YearMonth> {
        match ClosingState::of(settings) {
            ClosingState::ClosedThrough(month) => Some(month.next()),
            ClosingState::Unclosed => AggregationService::earliest_date(transactions).map(YearMonth::of),
        }
    }

    /// Financial months that are fully elapsed as of `today` and not yet closed.
    pub fn pending_months(
        settings: &Settings,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Vec<FinancialMonth> {
        let start_day = settings.month_start_day();
        let boundary = FinancialMonthCalculator::current_range(today, start_day).start;
        let mut pending = Vec::new();
        let Some(mut cursor) = Self::first_candidate(settings, transactions) else {
            return pending;
        };
        loop {
            let window = FinancialMonthCalculator::for_month(cursor, start_day);
            if window.start >= boundary {
                break;
            }
            pending.push(window);
            cursor = cursor.next();
        }
        pending
    }

    /// Closes every pending month, carries the combined surplus into the running
    /// balance and seeds `monthly_budget` with a forecast for the month after the
    /// new watermark. Returns `Ok(None)` without touching anything when no month is
    /// eligible.
    ///
    /// Goal progress and appended contribution transactions are left on the inputs;
    /// the caller persists them.
    pub fn close(
        settings: &mut Settings,
        transactions: &mut Vec<Transaction>,
        today: NaiveDate,
        options: &ClosingOptions,
    ) -> Result<Option<ClosingReport>, SettingsError> {
        let pending = Self::pending_months(settings, transactions, today);
        if pending.is_empty() {
            return Ok(None);
        }

        let mut months = Vec::with_capacity(pending.len());
        let mut contributions = Vec::new();
        let mut total_surplus = 0.0;
        let mut watermark = pending[0].period;

        for window in pending {
            if options.apply_contributions {
                let applied = SavingsService::process(
                    &mut settings.saving_goals,
                    transactions,
                    window.period,
                    window.start.day(),
                    &options.forecast.savings_category,
                );
                contributions.extend(applied);
            }

            let totals = AggregationService::totals_for_month(transactions, &window);
            let surplus = if totals.is_empty() {
                debug!(month = %window.period, "no transactions; advancing watermark only");
                0.0
            } else {
                totals.net()
            };
            total_surplus += surplus;
            settings.advance_watermark(window.period)?;
            watermark = window.period;
            debug!(
                month = %window.period,
                start = %window.start,
                end = %window.end,
                income = totals.income,
                expense = totals.expense,
                surplus,
                "closed financial month"
            );
            months.push(ClosedMonth {
                month: window,
                totals,
                surplus,
            });
        }

        settings.add_surplus(total_surplus)?;
        let forecast = ForecastService::forecast(
            transactions,
            settings,
            watermark.next(),
            &Self::forecast_options(settings, options),
        );
        ForecastService::save_forecast(settings, &forecast)?;

        info!(
            closed = months.len(),
            through = %watermark,
            total_surplus,
            balance = settings.overall_account_balance(),
            contributions = contributions.len(),
            "month-end closing complete"
        );

        Ok(Some(ClosingReport {
            months,
            contributions,
            total_surplus,
            balance: settings.overall_account_balance(),
            watermark,
            forecast,
        }))
    }
}
