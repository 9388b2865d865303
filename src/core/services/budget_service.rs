//! Budget spending, derived from transactions at read time.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Budget, BudgetPeriod, Transaction, TransactionType};
use crate::repository::Repository;
use crate::time::Clock;

/// One-shot notice raised when a budget crosses a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetAlert {
    /// Spending is between 100% and 110% of the limit.
    Exceeded,
    /// Spending is between 90% and 100% of the limit.
    NearLimit,
}

/// Colour band for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    Healthy,
    Caution,
    Warning,
    Over,
}

impl ProgressLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            ProgressLevel::Over
        } else if percentage >= 90.0 {
            ProgressLevel::Warning
        } else if percentage >= 75.0 {
            ProgressLevel::Caution
        } else {
            ProgressLevel::Healthy
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub period_start: NaiveDate,
    pub spent: f64,
    /// Raw share of the limit; may exceed 100.
    pub percentage: f64,
    /// `percentage` clamped to 100 for rendering.
    pub progress: f64,
    pub remaining: f64,
    pub level: ProgressLevel,
    pub alert: Option<BudgetAlert>,
}

pub struct BudgetService;

impl BudgetService {
    /// First local day of the window containing `today`. Weeks start on Monday,
    /// so a Sunday belongs to the week that began six days earlier.
    pub fn period_start(period: BudgetPeriod, today: NaiveDate) -> NaiveDate {
        match period {
            BudgetPeriod::Weekly => {
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
            }
            BudgetPeriod::Monthly => today.with_day(1).unwrap_or(today),
            BudgetPeriod::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }

    /// Sum of expense transactions in the budget's category dated on or after
    /// the start of the current period.
    pub fn spent(budget: &Budget, transactions: &[Transaction], clock: &dyn Clock) -> f64 {
        let start = Self::period_start(budget.period, clock.today());
        transactions
            .iter()
            .filter(|txn| txn.kind == TransactionType::Expense)
            .filter(|txn| txn.category == budget.category)
            .filter(|txn| clock.local_date(txn.date) >= start)
            .map(|txn| txn.amount)
            .sum()
    }

    pub fn status(budget: &Budget, transactions: &[Transaction], clock: &dyn Clock) -> BudgetStatus {
        let spent = Self::spent(budget, transactions, clock);
        let percentage = if budget.amount > 0.0 {
            spent / budget.amount * 100.0
        } else {
            0.0
        };
        BudgetStatus {
            budget: budget.clone(),
            period_start: Self::period_start(budget.period, clock.today()),
            spent,
            percentage,
            progress: percentage.min(100.0),
            remaining: (budget.amount - spent).max(0.0),
            level: ProgressLevel::from_percentage(percentage),
            alert: alert_for(percentage),
        }
    }

    /// Evaluates every stored budget against the stored transactions.
    pub fn statuses(repo: &Repository) -> Vec<BudgetStatus> {
        let transactions = repo.transactions().all();
        repo.budgets()
            .all()
            .iter()
            .map(|budget| Self::status(budget, &transactions, repo.clock()))
            .collect()
    }
}

fn alert_for(percentage: f64) -> Option<BudgetAlert> {
    if (100.0..110.0).contains(&percentage) {
        Some(BudgetAlert::Exceeded)
    } else if (90.0..100.0).contains(&percentage) {
        Some(BudgetAlert::NearLimit)
    } else {
        None
    }
}
