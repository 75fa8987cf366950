use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A savings target funded by recurring monthly contributions.
pub struct SavingGoal {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub monthly_contribution: f64,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default = "SavingGoal::default_active")]
    pub is_active: bool,
}

impl SavingGoal {
    pub fn new(
        name: impl Into<String>,
        target_amount: f64,
        monthly_contribution: f64,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            target_amount,
            current_amount: 0.0,
            monthly_contribution,
            start_date,
            target_date: None,
            is_active: true,
        }
    }

    pub fn with_target_date(mut self, target_date: NaiveDate) -> Self {
        self.target_date = Some(target_date);
        self
    }

    pub fn default_active() -> bool {
        true
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Whether the goal should receive contributions at all, independent of date.
    pub fn is_contributing(&self) -> bool {
        self.is_active && !self.is_completed() && self.monthly_contribution > 0.0
    }

    /// Whether `date` lies within the goal's contribution horizon.
    pub fn eligible_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        match self.target_date {
            Some(target) => date <= target,
            None => true,
        }
    }

    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 100.0;
        }
        (self.current_amount / self.target_amount * 100.0).min(100.0)
    }
}
