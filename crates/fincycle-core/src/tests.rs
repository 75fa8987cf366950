use chrono::NaiveDate;

use crate::{
    engine::FinancialCycleEngine, storage::SettingsStore, ClosingService, CoreError, FixedClock,
    MemorySettingsStore, MemoryTransactionStore,
};
use fincycle_config::EngineConfig;
use fincycle_domain::{Category, SavingGoal, Settings, SpecialDate, Transaction, YearMonth};

type TestEngine = FinancialCycleEngine<MemoryTransactionStore, MemorySettingsStore, FixedClock>;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

fn engine(settings: Settings, transactions: Vec<Transaction>, today: NaiveDate) -> TestEngine {
    FinancialCycleEngine::new(
        MemoryTransactionStore::new(transactions),
        MemorySettingsStore::new(settings),
        FixedClock::new(today),
        EngineConfig::default(),
    )
    .expect("engine")
}

fn flat_history() -> Vec<Transaction> {
    let mut txns = Vec::new();
    for m in 1..=3 {
        txns.push(Transaction::income(date(2024, m, 1), 5000.0, "Salary"));
        txns.push(Transaction::expense(date(2024, m, 10), 3000.0, "Living"));
    }
    txns
}

#[test]
fn closing_only_covers_fully_elapsed_windows() {
    let settings = Settings::with_month_start_day(15).unwrap();
    let txns = vec![
        Transaction::expense(date(2024, 1, 5), 100.0, "Food"),
        Transaction::income(date(2024, 1, 20), 1000.0, "Salary"),
        Transaction::expense(date(2024, 2, 20), 400.0, "Food"),
    ];
    let mut engine = engine(settings, txns, date(2024, 3, 10));

    let current = engine.current_financial_month();
    assert_eq!(current.start, date(2024, 2, 15));
    assert_eq!(current.end, date(2024, 3, 14));

    let report = engine.close_months().unwrap().expect("january closes");
    assert_eq!(report.months.len(), 1);
    assert_eq!(report.months[0].month.start, date(2024, 1, 15));
    assert_eq!(report.months[0].month.end, date(2024, 2, 14));
    assert_eq!(engine.settings().last_month_closed(), Some(month(2024, 1)));
    assert_eq!(engine.settings().overall_account_balance(), 1000.0);
}

#[test]
fn second_closing_without_new_months_is_a_no_op() {
    let mut engine = engine(Settings::default(), flat_history(), date(2024, 4, 15));
    assert!(engine.perform_month_end_closing().unwrap());
    let watermark = engine.settings().last_month_closed();
    let balance = engine.settings().overall_account_balance();
    let saves = engine.settings_store().save_count();

    assert!(!engine.perform_month_end_closing().unwrap());
    assert_eq!(engine.settings().last_month_closed(), watermark);
    assert_eq!(engine.settings().overall_account_balance(), balance);
    assert_eq!(engine.settings_store().save_count(), saves);
}

#[test]
fn watermark_advances_monotonically_as_time_passes() {
    let mut engine = engine(Settings::default(), flat_history(), date(2024, 2, 3));
    assert!(engine.perform_month_end_closing().unwrap());
    assert_eq!(engine.settings().last_month_closed(), Some(month(2024, 1)));

    engine.clock_mut().set(date(2024, 4, 2));
    assert!(engine.perform_month_end_closing().unwrap());
    assert_eq!(engine.settings().last_month_closed(), Some(month(2024, 3)));
    assert_eq!(engine.settings().overall_account_balance(), 6000.0);

    engine.clock_mut().set(date(2024, 4, 30));
    assert!(!engine.perform_month_end_closing().unwrap());
    assert_eq!(engine.settings().last_month_closed(), Some(month(2024, 3)));
}

#[test]
fn flat_history_forecasts_flat_budget() {
    let mut engine = engine(Settings::default(), flat_history(), date(2024, 4, 15));
    let report = engine.close_months().unwrap().expect("three months close");

    assert_eq!(report.months.len(), 3);
    assert_eq!(report.total_surplus, 6000.0);
    assert_eq!(report.forecast.target, month(2024, 4));
    assert!((report.forecast.mean_budget - 3000.0).abs() < 1e-6);
    assert!((report.forecast.base_budget - 3000.0).abs() < 1e-6);
    assert!((report.forecast.final_budget - 3000.0).abs() < 1e-6);
    assert!((report.forecast.average_income - 5000.0).abs() < 1e-6);
    assert!((report.forecast.average_balance - 2000.0).abs() < 1e-6);
    assert!((engine.settings().monthly_budget - 3000.0).abs() < 1e-6);
    assert!((engine.settings_store().snapshot().monthly_budget - 3000.0).abs() < 1e-6);
}

#[test]
fn empty_months_advance_watermark_without_surplus() {
    let mut settings = Settings::default();
    settings.advance_watermark(month(2023, 12)).unwrap();
    let txns = vec![Transaction::income(date(2024, 3, 3), 200.0, "Gift")];
    let mut engine = engine(settings, txns, date(2024, 4, 1));

    let report = engine.close_months().unwrap().expect("months close");
    assert_eq!(report.months.len(), 3);
    assert_eq!(report.months[0].surplus, 0.0);
    assert_eq!(report.months[1].surplus, 0.0);
    assert_eq!(report.months[2].surplus, 200.0);
    assert_eq!(engine.settings().last_month_closed(), Some(month(2024, 3)));
    assert_eq!(engine.settings().overall_account_balance(), 200.0);
}

#[test]
fn closing_with_no_history_reports_nothing() {
    let mut engine = engine(Settings::default(), Vec::new(), date(2024, 4, 1));
    assert!(!engine.perform_month_end_closing().unwrap());
    assert_eq!(engine.settings().last_month_closed(), None);
    assert_eq!(engine.settings_store().save_count(), 0);
}

#[test]
fn closing_books_one_contribution_per_closed_month() {
    let mut settings = Settings::default();
    settings
        .saving_goals
        .push(SavingGoal::new("Emergency", 500.0, 200.0, date(2024, 1, 1)));
    let mut engine = engine(settings, flat_history(), date(2024, 4, 15));

    let report = engine.close_months().unwrap().expect("closes");

    assert_eq!(report.contributions.len(), 3);
    let amounts: Vec<f64> = report.contributions.iter().map(|c| c.amount).collect();
    assert_eq!(amounts, vec![200.0, 200.0, 100.0]);
    assert_eq!(engine.settings().saving_goals[0].current_amount, 500.0);
    assert_eq!(report.total_surplus, 6000.0 - 500.0);

    let stored = engine.transaction_store().snapshot();
    let savings = Category::new("Savings");
    let booked: Vec<&Transaction> = stored.iter().filter(|t| t.category == savings).collect();
    assert_eq!(booked.len(), 3);
    assert_eq!(booked[0].date, date(2024, 1, 1));
    // Savings transactions do not inflate the forecast.
    assert!((report.forecast.base_budget - 3000.0).abs() < 1e-6);
    // The goal is complete, so it no longer adds to the budget.
    assert_eq!(report.forecast.saving_goal_total, 0.0);
}

#[test]
fn contributions_can_be_disabled_on_close() {
    let mut settings = Settings::default();
    settings
        .saving_goals
        .push(SavingGoal::new("Emergency", 500.0, 200.0, date(2024, 1, 1)));
    let config = EngineConfig {
        apply_contributions_on_close: false,
        ..EngineConfig::default()
    };
    let mut engine = FinancialCycleEngine::new(
        MemoryTransactionStore::new(flat_history()),
        MemorySettingsStore::new(settings),
        FixedClock::new(date(2024, 4, 15)),
        config,
    )
    .unwrap();

    let report = engine.close_months().unwrap().expect("closes");
    assert!(report.contributions.is_empty());
    assert_eq!(engine.transaction_store().save_count(), 0);
    assert_eq!(report.forecast.saving_goal_total, 200.0);
    assert!((report.forecast.final_budget - 3200.0).abs() < 1e-6);
}

#[test]
fn failed_settings_save_keeps_in_memory_progress() {
    let mut engine = engine(Settings::default(), flat_history(), date(2024, 4, 15));
    engine.settings_store().set_fail_saves(true);

    let err = engine.perform_month_end_closing().unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(engine.settings().last_month_closed(), Some(month(2024, 3)));
    assert_eq!(engine.settings_store().snapshot().last_month_closed(), None);

    engine.settings_store().set_fail_saves(false);
    engine.save_settings().unwrap();
    assert_eq!(
        engine.settings_store().snapshot().last_month_closed(),
        Some(month(2024, 3))
    );
    assert!(!engine.perform_month_end_closing().unwrap());
}

#[test]
fn failed_transaction_save_keeps_contributions_for_retry() {
    let mut settings = Settings::default();
    settings
        .saving_goals
        .push(SavingGoal::new("Emergency", 5000.0, 200.0, date(2024, 1, 1)));
    let mut engine = engine(settings, flat_history(), date(2024, 4, 15));
    engine.transaction_store().set_fail_saves(true);

    let err = engine.close_months().unwrap_err();
    assert!(err.is_persistence());
    assert!(engine.has_unsaved_transactions());
    assert_eq!(engine.settings().saving_goals[0].current_amount, 600.0);
    assert_eq!(engine.settings_store().snapshot().last_month_closed(), None);

    let savings = Category::new("Savings");
    let working = engine.load_transactions().unwrap();
    assert_eq!(working.iter().filter(|t| t.category == savings).count(), 3);

    // Still failing: the held set survives another attempt.
    assert!(engine.retry_save().is_err());
    assert!(engine.has_unsaved_transactions());

    engine.transaction_store().set_fail_saves(false);
    engine.retry_save().unwrap();
    assert!(!engine.has_unsaved_transactions());
    let stored = engine.transaction_store().snapshot();
    assert_eq!(stored.iter().filter(|t| t.category == savings).count(), 3);
    let persisted = engine.settings_store().snapshot();
    assert_eq!(persisted.last_month_closed(), Some(month(2024, 3)));
    assert_eq!(persisted.saving_goals[0].current_amount, 600.0);
    assert!(!engine.perform_month_end_closing().unwrap());
}

#[test]
fn next_operation_flushes_unsaved_manual_contribution() {
    let mut settings = Settings::default();
    settings
        .saving_goals
        .push(SavingGoal::new("Vacation", 1200.0, 100.0, date(2024, 1, 1)));
    let mut engine = engine(settings, Vec::new(), date(2024, 3, 5));
    let category = Category::new("Savings");
    engine.transaction_store().set_fail_saves(true);

    assert!(engine
        .process_monthly_savings_contributions(month(2024, 3), 5, &category)
        .is_err());
    assert!(engine.transaction_store().snapshot().is_empty());

    engine.transaction_store().set_fail_saves(false);
    assert!(engine
        .process_monthly_savings_contributions(month(2024, 4), 5, &category)
        .unwrap());
    assert!(!engine.has_unsaved_transactions());
    let stored = engine.transaction_store().snapshot();
    let dates: Vec<NaiveDate> = stored.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 5), date(2024, 4, 5)]);
    assert_eq!(engine.settings_store().snapshot().saving_goals[0].current_amount, 200.0);
}

#[test]
fn forecast_counts_goals_on_the_day_closing_books_them() {
    let mut settings = Settings::with_month_start_day(15).unwrap();
    settings.advance_watermark(month(2024, 4)).unwrap();
    settings
        .saving_goals
        .push(SavingGoal::new("Car", 5000.0, 300.0, date(2024, 5, 10)));
    let mut engine = engine(settings, Vec::new(), date(2024, 5, 20));

    let forecast = engine.forecast_next_month_budget(3).unwrap();
    assert_eq!(forecast.target, month(2024, 5));
    assert_eq!(forecast.saving_goal_total, 300.0);

    engine.clock_mut().set(date(2024, 6, 20));
    let report = engine.close_months().unwrap().expect("may closes");
    let booked: Vec<(NaiveDate, f64)> = report.contributions.iter().map(|c| (c.date, c.amount)).collect();
    assert_eq!(booked, vec![(date(2024, 5, 15), 300.0)]);
    assert_eq!(forecast.saving_goal_total, report.contributions[0].amount);
    // June is counted on June 15 as well.
    assert_eq!(report.forecast.target, month(2024, 6));
    assert_eq!(report.forecast.saving_goal_total, 300.0);
}

#[test]
fn manual_contributions_are_persisted() {
    let mut settings = Settings::default();
    settings
        .saving_goals
        .push(SavingGoal::new("Vacation", 1200.0, 100.0, date(2024, 1, 1)));
    let mut engine = engine(settings, Vec::new(), date(2024, 3, 5));
    let category = Category::new("Goals");

    assert!(engine
        .process_monthly_savings_contributions(month(2024, 3), 5, &category)
        .unwrap());

    let stored = engine.transaction_store().snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].date, date(2024, 3, 5));
    assert_eq!(stored[0].category, category);
    let persisted = engine.settings_store().load().unwrap();
    assert_eq!(persisted.saving_goals[0].current_amount, 100.0);
    assert!(persisted.expense_categories.contains(&category));
}

#[test]
fn manual_contributions_without_goals_report_false() {
    let mut engine = engine(Settings::default(), Vec::new(), date(2024, 3, 5));
    assert!(!engine
        .process_monthly_savings_contributions(month(2024, 3), 1, &Category::new("Savings"))
        .unwrap());
    assert_eq!(engine.transaction_store().save_count(), 0);
}

#[test]
fn forecast_targets_month_after_watermark() {
    let mut settings = Settings::default();
    settings.advance_watermark(month(2024, 3)).unwrap();
    settings
        .special_dates
        .push(SpecialDate::new("Trip", date(2024, 4, 10), "Travel", 500.0));
    settings
        .special_dates
        .push(SpecialDate::new("Hotel", date(2024, 4, 12), "Travel", 300.0));
    let engine = engine(settings, flat_history(), date(2024, 4, 20));

    let forecast = engine.forecast_next_month_budget(6).unwrap();
    assert_eq!(forecast.target, month(2024, 4));
    assert_eq!(forecast.special_day_total, 800.0);
    assert!((forecast.final_budget - 3800.0).abs() < 1e-6);
    assert!((forecast.allocation_for(&Category::new("Travel")) - 800.0).abs() < 1e-9);
    assert_eq!(engine.settings().monthly_budget, 0.0);
}

#[test]
fn forecast_rejects_zero_window() {
    let engine = engine(Settings::default(), Vec::new(), date(2024, 4, 20));
    let err = engine.forecast_next_month_budget(0).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn save_forecast_persists_final_budget() {
    let mut engine = engine(Settings::default(), flat_history(), date(2024, 4, 20));
    let forecast = engine.analyze_next_month().unwrap();
    engine.save_forecast(&forecast).unwrap();
    assert!((engine.settings_store().snapshot().monthly_budget - 3000.0).abs() < 1e-6);
}

#[test]
fn update_transaction_replaces_by_id() {
    let original = Transaction::expense(date(2024, 1, 2), 10.0, "Food");
    let id = original.id;
    let mut engine = engine(Settings::default(), vec![original.clone()], date(2024, 2, 1));

    let mut replacement = original;
    replacement.amount = 25.0;
    engine.update_transaction(replacement).unwrap();
    assert_eq!(engine.transaction_store().snapshot()[0].amount, 25.0);
    assert_eq!(engine.transaction_store().snapshot()[0].id, id);

    let missing = Transaction::expense(date(2024, 1, 2), 1.0, "Food");
    let missing_id = missing.id;
    assert!(matches!(
        engine.update_transaction(missing),
        Err(CoreError::TransactionNotFound(found)) if found == missing_id
    ));
}

#[test]
fn add_transaction_rejects_negative_amounts() {
    let mut engine = engine(Settings::default(), Vec::new(), date(2024, 2, 1));
    let err = engine
        .add_transaction(Transaction::expense(date(2024, 1, 2), -5.0, "Food"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Settings(_)));
}

#[test]
fn pending_months_start_from_earliest_transaction_month() {
    let settings = Settings::default();
    let txns = vec![Transaction::expense(date(2023, 11, 20), 5.0, "Food")];
    let pending = ClosingService::pending_months(&settings, &txns, date(2024, 1, 10));
    let periods: Vec<YearMonth> = pending.iter().map(|m| m.period).collect();
    assert_eq!(periods, vec![month(2023, 11), month(2023, 12)]);
}

#[test]
fn month_summary_uses_financial_window() {
    let settings = Settings::with_month_start_day(10).unwrap();
    let txns = vec![
        Transaction::income(date(2024, 2, 9), 50.0, "Refund"),
        Transaction::income(date(2024, 2, 10), 70.0, "Refund"),
        Transaction::expense(date(2024, 3, 9), 20.0, "Food"),
    ];
    let engine = engine(settings, txns, date(2024, 4, 1));
    let totals = engine.month_summary(month(2024, 2)).unwrap();
    assert_eq!(totals.income, 70.0);
    assert_eq!(totals.expense, 20.0);
    assert_eq!(totals.net(), 50.0);
}
