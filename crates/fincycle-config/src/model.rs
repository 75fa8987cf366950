use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tunables for the financial cycle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Category reserved for synthetic savings contributions. Excluded from forecasts.
    #[serde(default = "EngineConfig::default_savings_category")]
    pub savings_category: String,
    /// Trailing window used for full budget analysis.
    #[serde(default = "EngineConfig::default_analysis_window")]
    pub analysis_window_months: u32,
    /// Trailing window used when closing seeds the next month's budget.
    #[serde(default = "EngineConfig::default_closing_window")]
    pub closing_forecast_window_months: u32,
    #[serde(default = "EngineConfig::default_contribution_day")]
    pub contribution_day: u32,
    #[serde(default = "EngineConfig::default_apply_contributions")]
    pub apply_contributions_on_close: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            savings_category: Self::default_savings_category(),
            analysis_window_months: Self::default_analysis_window(),
            closing_forecast_window_months: Self::default_closing_window(),
            contribution_day: Self::default_contribution_day(),
            apply_contributions_on_close: Self::default_apply_contributions(),
        }
    }
}

impl EngineConfig {
    pub fn default_savings_category() -> String {
        "Savings".into()
    }

    pub fn default_analysis_window() -> u32 {
        3
    }

    pub fn default_closing_window() -> u32 {
        6
    }

    pub fn default_contribution_day() -> u32 {
        1
    }

    pub fn default_apply_contributions() -> bool {
        true
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.savings_category.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "savings_category must not be blank".into(),
            ));
        }
        if self.analysis_window_months == 0 || self.closing_forecast_window_months == 0 {
            return Err(ConfigError::Invalid(
                "forecast windows must cover at least one month".into(),
            ));
        }
        if !(1..=31).contains(&self.contribution_day) {
            return Err(ConfigError::Invalid(format!(
                "contribution_day must be between 1 and 31, got {}",
                self.contribution_day
            )));
        }
        Ok(())
    }
}
