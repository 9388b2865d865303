mod common;

use cartera_core::core::services::{
    BudgetAlert, BudgetService, GoalService, ProgressLevel, StatsPeriod, SummaryService,
};
use cartera_core::domain::{
    Budget, BudgetPeriod, FinancialGoal, GoalCategory, Transaction, TransactionCategory,
    TransactionType,
};
use cartera_core::errors::OperationError;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use common::{clock_on, memory_repository};

fn expense_on(id: &str, category: TransactionCategory, amount: f64, date: NaiveDate) -> Transaction {
    Transaction::new(
        id,
        TransactionType::Expense,
        amount,
        "USD".into(),
        category,
        Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap()),
    )
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn weekly_budget_counts_from_monday_only() {
    // Sunday 2024-05-19; the week began Monday 2024-05-13.
    let (repo, _store) = memory_repository(clock_on(2024, 5, 19));
    let now = repo.clock().now();
    repo.budgets()
        .save(&Budget::new("b1", TransactionCategory::Food, 100.0, "USD".into(), BudgetPeriod::Weekly, now))
        .unwrap();
    repo.transactions()
        .replace_all(&[
            expense_on("old", TransactionCategory::Food, 40.0, day(2024, 5, 12)),
            expense_on("mon", TransactionCategory::Food, 60.0, day(2024, 5, 13)),
            expense_on("sun", TransactionCategory::Food, 35.0, day(2024, 5, 19)),
            expense_on("other", TransactionCategory::Health, 80.0, day(2024, 5, 14)),
        ])
        .unwrap();

    let statuses = BudgetService::statuses(&repo);
    assert_eq!(statuses.len(), 1);
    let status = &statuses[0];
    assert_eq!(status.period_start, day(2024, 5, 13));
    assert_eq!(status.spent, 95.0);
    assert_eq!(status.alert, Some(BudgetAlert::NearLimit));
    assert_eq!(status.level, ProgressLevel::Warning);
    assert!((status.remaining - 5.0).abs() < 1e-9);
}

#[test]
fn monthly_budget_starts_on_the_first_of_the_month() {
    let (repo, _store) = memory_repository(clock_on(2024, 5, 15));
    let now = repo.clock().now();
    repo.budgets()
        .save(&Budget::new("b1", TransactionCategory::Food, 100.0, "USD".into(), BudgetPeriod::Monthly, now))
        .unwrap();
    repo.transactions()
        .replace_all(&[
            expense_on("first", TransactionCategory::Food, 10.0, day(2024, 5, 1)),
            expense_on("april", TransactionCategory::Food, 20.0, day(2024, 4, 30)),
        ])
        .unwrap();

    let status = &BudgetService::statuses(&repo)[0];
    assert_eq!(status.period_start, day(2024, 5, 1));
    assert_eq!(status.spent, 10.0);
    assert_eq!(status.alert, None);
}

#[test]
fn overspent_budget_reports_raw_percentage() {
    let (repo, _store) = memory_repository(clock_on(2024, 5, 20));
    let now = repo.clock().now();
    repo.budgets()
        .save(&Budget::new("b1", TransactionCategory::Transport, 50.0, "USD".into(), BudgetPeriod::Monthly, now))
        .unwrap();
    repo.transactions()
        .save(&expense_on("t1", TransactionCategory::Transport, 52.0, day(2024, 5, 2)))
        .unwrap();

    let status = &BudgetService::statuses(&repo)[0];
    assert!((status.percentage - 104.0).abs() < 1e-9);
    assert_eq!(status.progress, 100.0);
    assert_eq!(status.remaining, 0.0);
    assert_eq!(status.alert, Some(BudgetAlert::Exceeded));
}

#[test]
fn goal_completion_latches_after_withdrawal_attempts() {
    let (repo, _store) = memory_repository(clock_on(2024, 5, 15));
    let now = repo.clock().now();
    repo.goals()
        .save(&FinancialGoal::new(
            "g1",
            "Trip",
            300.0,
            "USD".into(),
            now + Duration::days(60),
            GoalCategory::Savings,
            now,
        ))
        .unwrap();

    let goal = GoalService::add_to_goal(&repo, "g1", 120.0).unwrap();
    assert!(!goal.completed);
    let goal = GoalService::add_to_goal(&repo, "g1", 200.0).unwrap();
    assert!(goal.completed);
    assert_eq!(GoalService::progress(&goal).percentage, 100.0);

    let goal = GoalService::add_to_goal(&repo, "g1", -50.0).unwrap();
    assert_eq!(goal.current_amount, 270.0);
    assert!(goal.completed, "completion never reverts");

    let err = GoalService::add_to_goal(&repo, "nope", 10.0).unwrap_err();
    assert!(matches!(err, OperationError::GoalNotFound(_)));
}

#[test]
fn statistics_for_the_year_include_earlier_months() {
    let (repo, _store) = memory_repository(clock_on(2024, 5, 15));
    repo.transactions()
        .replace_all(&[
            expense_on("jan", TransactionCategory::Health, 30.0, day(2024, 1, 10)),
            expense_on("may", TransactionCategory::Food, 10.0, day(2024, 5, 14)),
            expense_on("last-year", TransactionCategory::Food, 99.0, day(2023, 12, 31)),
        ])
        .unwrap();

    let year = SummaryService::statistics(&repo, StatsPeriod::Year);
    assert_eq!(year.totals.expenses, 40.0);
    assert_eq!(year.top_expenses[0].category, TransactionCategory::Health);
    assert!((year.top_expenses[0].share - 75.0).abs() < 1e-9);

    let month = SummaryService::statistics(&repo, StatsPeriod::Month);
    assert_eq!(month.totals.expenses, 10.0);
    assert_eq!(month.top_expenses.len(), 1);
}
