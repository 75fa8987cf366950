//! Maps calendar year-months onto financial-month windows.

use chrono::{Datelike, Duration, NaiveDate};

use fincycle_domain::{shift_month, FinancialMonth, YearMonth};

/// Pure helpers resolving financial-month windows from a configurable start day.
pub struct FinancialMonthCalculator;

impl FinancialMonthCalculator {
    /// Window for `year`/`month`. Returns `None` only for an invalid month number.
    pub fn range(year: i32, month: u32, start_day: u32) -> Option<FinancialMonth> {
        YearMonth::new(year, month).map(|period| Self::for_month(period, start_day))
    }

    /// The window starts on `start_day` (clamped to the month's last day) and ends
    /// the day before the same day one month later.
    pub fn for_month(period: YearMonth, start_day: u32) -> FinancialMonth {
        let start = period.day(start_day);
        let end = shift_month(start, 1) - Duration::days(1);
        FinancialMonth { period, start, end }
    }

    /// The window containing `date`: this calendar month's if the day-of-month has
    /// reached `start_day`, the previous month's otherwise.
    pub fn containing(date: NaiveDate, start_day: u32) -> FinancialMonth {
        let period = YearMonth::of(date);
        if date.day() >= start_day.min(period.days_in_month()) {
            Self::for_month(period, start_day)
        } else {
            Self::for_month(period.prev(), start_day)
        }
    }

    pub fn current_range(today: NaiveDate, start_day: u32) -> FinancialMonth {
        Self::containing(today, start_day)
    }

    /// Consecutive windows from `first` through `last` inclusive.
    pub fn months_between(first: YearMonth, last: YearMonth, start_day: u32) -> Vec<FinancialMonth> {
        let mut months = Vec::new();
        let mut cursor = first;
        while cursor <= last {
            months.push(Self::for_month(cursor, start_day));
            cursor = cursor.next();
        }
        months
    }
}
