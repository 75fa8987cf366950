use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::YearMonth;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// A financial month: the window labelled by `period` that begins on the
/// configured start day. Both bounds are inclusive.
pub struct FinancialMonth {
    pub period: YearMonth,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FinancialMonth {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered by the window.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
