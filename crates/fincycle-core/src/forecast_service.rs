//! Budget forecasting from trailing expense history, special dates and savings goals.

use std::collections::BTreeMap;

use tracing::{debug, info};

use fincycle_domain::{
    Category, ForecastResult, MonthlyExpense, Settings, SettingsError, Transaction, YearMonth,
};

use crate::{
    aggregation_service::AggregationService, financial_month::FinancialMonthCalculator,
    savings_service::SavingsService, special_date_service::SpecialDateService,
};

/// Guards the regression denominator for degenerate (single-point) windows.
pub const REGRESSION_EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq)]
/// Parameters shared by every forecast call.
pub struct ForecastOptions {
    pub window_months: u32,
    pub savings_category: Category,
    pub contribution_day: u32,
}

pub struct ForecastService;

impl ForecastService {
    /// Forecasts the budget for `target` from the `window_months` financial months
    /// immediately preceding it. Never fails: an empty history yields a budget made
    /// only of special-date and savings-goal components.
    pub fn forecast(
        transactions: &[Transaction],
        settings: &Settings,
        target: YearMonth,
        options: &ForecastOptions,
    ) -> ForecastResult {
        let window = Self::monthly_history(transactions, settings, target, options);
        let expenses: Vec<f64> = window.iter().map(|entry| entry.expense).collect();
        let mean_budget = Self::mean(&expenses);
        let base_budget = Self::linear_projection(&expenses);

        let ratios = Self::category_ratios(transactions, settings, target, options);
        let special_dates = SpecialDateService::matching(&settings.special_dates, target);
        let deltas = SpecialDateService::adjustments_for_month(&settings.special_dates, target);
        let special_day_total = deltas.values().fold(0.0, |total, delta| total + delta);
        let saving_goal_total =
            SavingsService::expected_total(&settings.saving_goals, target, options.contribution_day);

        let mut category_allocation: BTreeMap<Category, f64> = ratios
            .into_iter()
            .map(|(category, ratio)| (category, base_budget * ratio))
            .collect();
        for (category, delta) in deltas {
            *category_allocation.entry(category).or_default() += delta;
        }

        let analyzed = window.len();
        let average_income = if analyzed == 0 {
            0.0
        } else {
            window.iter().map(|entry| entry.income).sum::<f64>() / analyzed as f64
        };
        let average_expense = mean_budget;
        let final_budget = base_budget + special_day_total + saving_goal_total;

        debug!(
            %target,
            analyzed,
            mean_budget,
            base_budget,
            special_day_total,
            saving_goal_total,
            final_budget,
            "computed budget forecast"
        );

        ForecastResult {
            target,
            mean_budget,
            base_budget,
            special_day_total,
            saving_goal_total,
            final_budget,
            category_allocation,
            special_dates,
            average_income,
            average_expense,
            average_balance: average_income - average_expense,
            window,
        }
    }

    /// Per-month totals for the trailing window, oldest first. Months without any
    /// non-savings transaction are left out rather than counted as zero.
    pub fn monthly_history(
        transactions: &[Transaction],
        settings: &Settings,
        target: YearMonth,
        options: &ForecastOptions,
    ) -> Vec<MonthlyExpense> {
        if options.window_months == 0 {
            return Vec::new();
        }
        let first = target.plus_months(-(options.window_months as i32));
        FinancialMonthCalculator::months_between(first, target.prev(), settings.month_start_day())
            .into_iter()
            .filter_map(|month| {
                let totals = AggregationService::totals_for_month_excluding(
                    transactions,
                    &month,
                    &options.savings_category,
                );
                if totals.is_empty() {
                    return None;
                }
                Some(MonthlyExpense {
                    month,
                    income: totals.income,
                    expense: totals.expense,
                    transaction_count: totals.count,
                })
            })
            .collect()
    }

    /// Share of window expense per category, savings excluded. Empty when nothing was spent.
    pub fn category_ratios(
        transactions: &[Transaction],
        settings: &Settings,
        target: YearMonth,
        options: &ForecastOptions,
    ) -> BTreeMap<Category, f64> {
        if options.window_months == 0 {
            return BTreeMap::new();
        }
        let start_day = settings.month_start_day();
        let first = FinancialMonthCalculator::for_month(
            target.plus_months(-(options.window_months as i32)),
            start_day,
        );
        let last = FinancialMonthCalculator::for_month(target.prev(), start_day);
        let per_category = AggregationService::expense_by_category(
            transactions,
            first.start,
            last.end,
            Some(&options.savings_category),
        );
        let total: f64 = per_category.values().sum();
        if total <= 0.0 {
            return BTreeMap::new();
        }
        per_category
            .into_iter()
            .map(|(category, amount)| (category, amount / total))
            .collect()
    }

    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Least-squares fit of `y = a + b·x` over `x = 1..=n`, evaluated at `x = n + 1`.
    pub fn linear_projection(values: &[f64]) -> f64 {
        let n = values.len() as f64;
        if values.is_empty() {
            return 0.0;
        }
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (idx, y) in values.iter().enumerate() {
            let x = (idx + 1) as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }
        let mut denominator = n * sum_x2 - sum_x * sum_x;
        if denominator.abs() < REGRESSION_EPSILON {
            denominator = REGRESSION_EPSILON;
        }
        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        intercept + slope * (n + 1.0)
    }

    /// Writes the forecast's final budget back as the new monthly baseline.
    pub fn save_forecast(settings: &mut Settings, forecast: &ForecastResult) -> Result<(), SettingsError> {
        settings.set_monthly_budget(forecast.final_budget)?;
        info!(
            target = %forecast.target,
            budget = forecast.final_budget,
            "monthly budget updated from forecast"
        );
        Ok(())
    }
}
