//! Income, expense and net totals over arbitrary transaction slices.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use fincycle_domain::{Category, FinancialMonth, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Aggregated totals for a set of transactions.
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub count: usize,
}

impl Totals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn record(&mut self, txn: &Transaction) {
        if txn.is_expense {
            self.expense += txn.amount;
        } else {
            self.income += txn.amount;
        }
        self.count += 1;
    }
}

/// Stateless aggregation utilities. Input order is irrelevant; each call is a single pass.
pub struct AggregationService;

impl AggregationService {
    pub fn totals<'a, I>(transactions: I) -> Totals
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = Totals::default();
        for txn in transactions {
            totals.record(txn);
        }
        totals
    }

    /// Totals restricted to `[start, end]`, both inclusive.
    pub fn totals_in_range(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> Totals {
        Self::totals(Self::in_range(transactions, start, end))
    }

    pub fn totals_for_month(transactions: &[Transaction], month: &FinancialMonth) -> Totals {
        Self::totals_in_range(transactions, month.start, month.end)
    }

    /// Like [`Self::totals_for_month`] but ignoring one category (typically savings).
    pub fn totals_for_month_excluding(
        transactions: &[Transaction],
        month: &FinancialMonth,
        excluded: &Category,
    ) -> Totals {
        Self::totals(
            Self::in_range(transactions, month.start, month.end)
                .filter(|txn| &txn.category != excluded),
        )
    }

    pub fn in_range(
        transactions: &[Transaction],
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &Transaction> {
        transactions
            .iter()
            .filter(move |txn| txn.date >= start && txn.date <= end)
    }

    /// Expense sum per category in `[start, end]`, skipping `excluded`.
    pub fn expense_by_category(
        transactions: &[Transaction],
        start: NaiveDate,
        end: NaiveDate,
        excluded: Option<&Category>,
    ) -> BTreeMap<Category, f64> {
        let mut per_category: BTreeMap<Category, f64> = BTreeMap::new();
        for txn in Self::in_range(transactions, start, end) {
            if !txn.is_expense || excluded == Some(&txn.category) {
                continue;
            }
            *per_category.entry(txn.category.clone()).or_default() += txn.amount;
        }
        per_category
    }

    pub fn earliest_date(transactions: &[Transaction]) -> Option<NaiveDate> {
        transactions.iter().map(|txn| txn.date).min()
    }
}
