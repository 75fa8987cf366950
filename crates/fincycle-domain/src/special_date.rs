use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::YearMonth};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A dated event that raises (or lowers) one category's budget by a flat amount.
pub struct SpecialDate {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub affected_category: Category,
    /// Additive delta in currency units; may be negative.
    pub amount_increase: f64,
    /// When set, the date applies to the same calendar month of every year.
    #[serde(default)]
    pub recurs_annually: bool,
}

impl SpecialDate {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        affected_category: impl Into<Category>,
        amount_increase: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            description: String::new(),
            affected_category: affected_category.into(),
            amount_increase,
            recurs_annually: false,
        }
    }

    pub fn annually(mut self) -> Self {
        self.recurs_annually = true;
        self
    }

    pub fn falls_in(&self, month: YearMonth) -> bool {
        if self.recurs_annually {
            self.date.month() == month.month() && self.date.year() <= month.year()
        } else {
            month.contains(self.date)
        }
    }
}
