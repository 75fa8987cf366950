//! Category budget deltas contributed by special dates.

use std::collections::BTreeMap;

use fincycle_domain::{Category, SpecialDate, YearMonth};

pub struct SpecialDateService;

impl SpecialDateService {
    /// Special dates falling in `month`, in input order.
    pub fn matching(special_dates: &[SpecialDate], month: YearMonth) -> Vec<SpecialDate> {
        special_dates
            .iter()
            .filter(|special| special.falls_in(month))
            .cloned()
            .collect()
    }

    /// Sums `amount_increase` per affected category for dates in `month`.
    /// An empty map means no adjustment; absence is zero.
    pub fn adjustments_for_month(
        special_dates: &[SpecialDate],
        month: YearMonth,
    ) -> BTreeMap<Category, f64> {
        let mut deltas: BTreeMap<Category, f64> = BTreeMap::new();
        for special in special_dates.iter().filter(|special| special.falls_in(month)) {
            *deltas.entry(special.affected_category.clone()).or_default() +=
                special.amount_increase;
        }
        deltas
    }

    pub fn total_for_month(special_dates: &[SpecialDate], month: YearMonth) -> f64 {
        special_dates
            .iter()
            .filter(|special| special.falls_in(month))
            .fold(0.0, |total, special| total + special.amount_increase)
    }
}
