use thiserror::Error;

use crate::common::YearMonth;

/// Rejections raised while mutating [`crate::Settings`] or parsing calendar values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("month start day must be between 1 and 28, got {0}")]
    InvalidMonthStartDay(u32),
    #[error("closing watermark cannot move from {current} back to {attempted}")]
    WatermarkRegression {
        current: YearMonth,
        attempted: YearMonth,
    },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid year-month `{0}`, expected yyyy-MM")]
    InvalidYearMonth(String),
}
