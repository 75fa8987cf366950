use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{category::Category, common::YearMonth, period::FinancialMonth, special_date::SpecialDate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Totals for one analyzed financial month in a forecast window.
pub struct MonthlyExpense {
    pub month: FinancialMonth,
    pub income: f64,
    /// Expense excluding the reserved savings category.
    pub expense: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Outcome of a budget forecast for a single target month.
pub struct ForecastResult {
    pub target: YearMonth,
    pub mean_budget: f64,
    /// Linear-regression projection; the statistical base of `final_budget`.
    pub base_budget: f64,
    pub special_day_total: f64,
    pub saving_goal_total: f64,
    pub final_budget: f64,
    pub category_allocation: BTreeMap<Category, f64>,
    pub special_dates: Vec<SpecialDate>,
    pub average_income: f64,
    pub average_expense: f64,
    pub average_balance: f64,
    pub window: Vec<MonthlyExpense>,
}

impl ForecastResult {
    pub fn analyzed_months(&self) -> usize {
        self.window.len()
    }

    pub fn allocation_for(&self, category: &Category) -> f64 {
        self.category_allocation.get(category).copied().unwrap_or(0.0)
    }
}
