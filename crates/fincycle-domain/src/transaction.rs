//! Transaction records as stored by the external transaction store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, SettingsError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Non-negative magnitude; direction is carried by `is_expense`.
    pub amount: f64,
    pub category: Category,
    pub is_expense: bool,
    #[serde(default)]
    pub participant: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn expense(date: NaiveDate, amount: f64, category: impl Into<Category>) -> Self {
        Self::new(date, amount, category, true)
    }

    pub fn income(date: NaiveDate, amount: f64, category: impl Into<Category>) -> Self {
        Self::new(date, amount, category, false)
    }

    pub fn new(
        date: NaiveDate,
        amount: f64,
        category: impl Into<Category>,
        is_expense: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            category: category.into(),
            is_expense,
            participant: String::new(),
            notes: String::new(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_participant(mut self, participant: impl Into<String>) -> Self {
        self.participant = participant.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Signed contribution to a net total: negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        if self.is_expense {
            -self.amount
        } else {
            self.amount
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(SettingsError::InvalidAmount(format!(
                "transaction {} has amount {}",
                self.id, self.amount
            )));
        }
        Ok(())
    }
}
