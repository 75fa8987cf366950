//! Automated monthly contributions toward saving goals.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use fincycle_domain::{Category, SavingGoal, Transaction, YearMonth};

#[derive(Debug, Clone, PartialEq)]
/// A single contribution made toward a goal.
pub struct Contribution {
    pub goal_id: Uuid,
    pub goal_name: String,
    pub transaction_id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
}

pub struct SavingsService;

impl SavingsService {
    /// Date a contribution for `month` is booked on: `day`, clamped to the month's end.
    pub fn contribution_date(month: YearMonth, day: u32) -> NaiveDate {
        month.day(day)
    }

    /// Goals that would contribute on `date`.
    pub fn eligible_goals(goals: &[SavingGoal], date: NaiveDate) -> impl Iterator<Item = &SavingGoal> {
        goals
            .iter()
            .filter(move |goal| goal.is_contributing() && goal.eligible_on(date))
    }

    /// Books one contribution per eligible goal for `month`, appending a synthetic
    /// expense to `transactions` and advancing each goal's `current_amount`.
    ///
    /// Contributions never overshoot a goal's target. Callers persist both the
    /// goals and the transactions, and must invoke this at most once per month.
    pub fn process(
        goals: &mut [SavingGoal],
        transactions: &mut Vec<Transaction>,
        month: YearMonth,
        day: u32,
        category: &Category,
    ) -> Vec<Contribution> {
        let date = Self::contribution_date(month, day);
        let mut applied = Vec::new();
        for goal in goals.iter_mut() {
            if !goal.is_contributing() || !goal.eligible_on(date) {
                continue;
            }
            let amount = goal.monthly_contribution.min(goal.remaining());
            if amount <= 0.0 {
                continue;
            }
            let txn = Transaction::expense(date, amount, category.clone())
                .with_description(format!("Savings contribution: {}", goal.name))
                .with_notes(format!("goal:{}", goal.id));
            goal.current_amount += amount;
            debug!(
                goal = %goal.name,
                amount,
                %date,
                progress = goal.progress_percent(),
                "booked savings contribution"
            );
            applied.push(Contribution {
                goal_id: goal.id,
                goal_name: goal.name.clone(),
                transaction_id: txn.id,
                date,
                amount,
            });
            transactions.push(txn);
        }
        applied
    }

    /// Sum of monthly contributions that active, incomplete goals expect in `month`.
    pub fn expected_total(goals: &[SavingGoal], month: YearMonth, day: u32) -> f64 {
        let date = Self::contribution_date(month, day);
        Self::eligible_goals(goals, date)
            .fold(0.0, |total, goal| total + goal.monthly_contribution)
    }
}
