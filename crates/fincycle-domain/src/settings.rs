//! The mutable state the engine reads and advances.

use serde::{Deserialize, Serialize};

use crate::{
    category::CategoryRegistry, common::YearMonth, goal::SavingGoal, special_date::SpecialDate,
    SettingsError,
};

pub const MIN_MONTH_START_DAY: u32 = 1;
pub const MAX_MONTH_START_DAY: u32 = 28;

/// User settings consumed by the financial cycle engine.
///
/// The closing watermark and running balance are only changed through
/// [`Settings::advance_watermark`] and [`Settings::add_surplus`], keeping the
/// watermark monotonic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "Settings::default_month_start_day")]
    month_start_day: u32,
    #[serde(default)]
    pub monthly_budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_month_closed: Option<YearMonth>,
    #[serde(default)]
    overall_account_balance: f64,
    #[serde(default = "Settings::default_currency_value")]
    pub default_currency: String,
    #[serde(default)]
    pub expense_categories: CategoryRegistry,
    #[serde(default)]
    pub income_categories: CategoryRegistry,
    #[serde(default)]
    pub saving_goals: Vec<SavingGoal>,
    #[serde(default)]
    pub special_dates: Vec<SpecialDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            month_start_day: Self::default_month_start_day(),
            monthly_budget: 0.0,
            last_month_closed: None,
            overall_account_balance: 0.0,
            default_currency: Self::default_currency_value(),
            expense_categories: CategoryRegistry::new(),
            income_categories: CategoryRegistry::new(),
            saving_goals: Vec::new(),
            special_dates: Vec::new(),
        }
    }
}

impl Settings {
    pub fn default_month_start_day() -> u32 {
        MIN_MONTH_START_DAY
    }

    pub fn default_currency_value() -> String {
        "USD".into()
    }

    pub fn with_month_start_day(day: u32) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        settings.set_month_start_day(day)?;
        Ok(settings)
    }

    pub fn month_start_day(&self) -> u32 {
        self.month_start_day
    }

    pub fn set_month_start_day(&mut self, day: u32) -> Result<(), SettingsError> {
        if !(MIN_MONTH_START_DAY..=MAX_MONTH_START_DAY).contains(&day) {
            return Err(SettingsError::InvalidMonthStartDay(day));
        }
        self.month_start_day = day;
        Ok(())
    }

    pub fn last_month_closed(&self) -> Option<YearMonth> {
        self.last_month_closed
    }

    /// Moves the closing watermark to `month`. Re-marking the current month is a no-op;
    /// moving backwards is rejected.
    pub fn advance_watermark(&mut self, month: YearMonth) -> Result<(), SettingsError> {
        if let Some(current) = self.last_month_closed {
            if month < current {
                return Err(SettingsError::WatermarkRegression {
                    current,
                    attempted: month,
                });
            }
        }
        self.last_month_closed = Some(month);
        Ok(())
    }

    pub fn overall_account_balance(&self) -> f64 {
        self.overall_account_balance
    }

    pub fn add_surplus(&mut self, surplus: f64) -> Result<(), SettingsError> {
        if !surplus.is_finite() {
            return Err(SettingsError::InvalidAmount(format!("surplus {surplus}")));
        }
        self.overall_account_balance += surplus;
        Ok(())
    }

    pub fn set_monthly_budget(&mut self, budget: f64) -> Result<(), SettingsError> {
        if !budget.is_finite() {
            return Err(SettingsError::InvalidAmount(format!("budget {budget}")));
        }
        self.monthly_budget = budget;
        Ok(())
    }

    /// Re-checks invariants that deserialization cannot enforce on its own.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_MONTH_START_DAY..=MAX_MONTH_START_DAY).contains(&self.month_start_day) {
            return Err(SettingsError::InvalidMonthStartDay(self.month_start_day));
        }
        for goal in &self.saving_goals {
            if goal.target_amount <= 0.0 || goal.current_amount < 0.0 || goal.monthly_contribution < 0.0
            {
                return Err(SettingsError::InvalidAmount(format!(
                    "saving goal `{}` has target {}, current {}, monthly {}",
                    goal.name, goal.target_amount, goal.current_amount, goal.monthly_contribution
                )));
            }
        }
        Ok(())
    }
}
