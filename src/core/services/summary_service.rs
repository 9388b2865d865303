//! Dashboard and statistics figures computed from stored transactions.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::currency::CurrencyCode;
use crate::domain::common::string_enum;
use crate::domain::{Transaction, TransactionCategory, TransactionType};
use crate::repository::{rank_categories, Repository};
use crate::time::Clock;

const RECENT_LIMIT: usize = 5;
const TOP_EXPENSE_LIMIT: usize = 5;
const DAILY_POINTS: usize = 7;

string_enum! {
    pub enum StatsPeriod("period") {
        Week => "week",
        Month => "month",
        Year => "year",
    }
}

/// Income, expense and sale totals over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub sales: f64,
}

impl Totals {
    fn from_transactions<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Self {
        transactions.fold(Totals::default(), |mut totals, txn| {
            match txn.kind {
                TransactionType::Income => totals.income += txn.amount,
                TransactionType::Expense => totals.expenses += txn.amount,
                TransactionType::Sale => totals.sales += txn.amount,
            }
            totals
        })
    }

    /// Income plus sales minus expenses.
    pub fn balance(&self) -> f64 {
        self.income + self.sales - self.expenses
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyOverview {
    pub currency: CurrencyCode,
    pub month_start: NaiveDate,
    pub totals: Totals,
    /// Most recent transactions, newest first.
    pub recent: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: TransactionCategory,
    pub total: f64,
    /// Percentage of the window's expenses.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub period: StatsPeriod,
    pub currency: CurrencyCode,
    pub totals: Totals,
    pub top_expenses: Vec<CategoryShare>,
    /// Expense totals for the last days with spending, oldest first.
    pub daily_expenses: Vec<DailyTotal>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn monthly_overview(repo: &Repository) -> MonthlyOverview {
        let clock = repo.clock();
        let today = clock.today();
        let mut transactions = repo.transactions().all();
        let totals = Totals::from_transactions(transactions.iter().filter(|txn| {
            let date = clock.local_date(txn.date);
            date.year() == today.year() && date.month() == today.month()
        }));
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions.truncate(RECENT_LIMIT);
        MonthlyOverview {
            currency: repo.settings().currency,
            month_start: today.with_day(1).unwrap_or(today),
            totals,
            recent: transactions,
        }
    }

    pub fn statistics(repo: &Repository, period: StatsPeriod) -> Statistics {
        let clock = repo.clock();
        let window = Window::for_period(period, clock);
        let in_window: Vec<Transaction> = repo
            .transactions()
            .all()
            .into_iter()
            .filter(|txn| window.contains(txn, clock))
            .collect();

        let totals = Totals::from_transactions(in_window.iter());
        let expenses = in_window
            .iter()
            .filter(|txn| txn.kind == TransactionType::Expense);
        let top_expenses = rank_categories(expenses.clone(), TOP_EXPENSE_LIMIT)
            .into_iter()
            .map(|entry| CategoryShare {
                category: entry.category,
                total: entry.total,
                share: if totals.expenses > 0.0 {
                    entry.total / totals.expenses * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Statistics {
            period,
            currency: repo.settings().currency,
            totals,
            top_expenses,
            daily_expenses: daily_series(expenses, clock),
        }
    }
}

enum Window {
    Since(DateTime<Utc>),
    SinceDay(NaiveDate),
}

impl Window {
    fn for_period(period: StatsPeriod, clock: &dyn Clock) -> Self {
        let today = clock.today();
        match period {
            StatsPeriod::Week => Window::Since(clock.now() - Duration::days(7)),
            StatsPeriod::Month => Window::SinceDay(today.with_day(1).unwrap_or(today)),
            StatsPeriod::Year => {
                Window::SinceDay(NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today))
            }
        }
    }

    fn contains(&self, txn: &Transaction, clock: &dyn Clock) -> bool {
        match self {
            Window::Since(start) => txn.date >= *start,
            Window::SinceDay(start) => clock.local_date(txn.date) >= *start,
        }
    }
}

fn daily_series<'a>(
    expenses: impl Iterator<Item = &'a Transaction>,
    clock: &dyn Clock,
) -> Vec<DailyTotal> {
    let mut days: Vec<DailyTotal> = Vec::new();
    for txn in expenses {
        let date = clock.local_date(txn.date);
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.amount += txn.amount,
            None => days.push(DailyTotal {
                date,
                amount: txn.amount,
            }),
        }
    }
    days.sort_by_key(|day| day.date);
    let skip = days.len().saturating_sub(DAILY_POINTS);
    days.split_off(skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::time::FixedClock;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn txn(id: &str, kind: TransactionType, category: TransactionCategory, amount: f64, day: u32, month: u32) -> Transaction {
        Transaction::new(
            id,
            kind,
            amount,
            "USD".into(),
            category,
            Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0).unwrap(),
        )
    }

    fn repo(transactions: &[Transaction]) -> Repository {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 6, 20).unwrap());
        let repo = Repository::new(Arc::new(MemoryStore::new()), Arc::new(clock));
        repo.transactions().replace_all(transactions).unwrap();
        repo
    }

    #[test]
    fn overview_sums_current_month_only() {
        let repo = repo(&[
            txn("1", TransactionType::Income, TransactionCategory::Salary, 1000.0, 1, 6),
            txn("2", TransactionType::Expense, TransactionCategory::Food, 40.0, 3, 6),
            txn("3", TransactionType::Sale, TransactionCategory::Sale, 25.0, 10, 6),
            txn("4", TransactionType::Expense, TransactionCategory::Food, 999.0, 31, 5),
        ]);
        let overview = SummaryService::monthly_overview(&repo);
        assert_eq!(overview.totals.income, 1000.0);
        assert_eq!(overview.totals.expenses, 40.0);
        assert_eq!(overview.totals.sales, 25.0);
        assert_eq!(overview.totals.balance(), 985.0);
        let recent: Vec<&str> = overview.recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(recent, vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn statistics_rank_expenses_within_window() {
        let repo = repo(&[
            txn("1", TransactionType::Expense, TransactionCategory::Food, 30.0, 2, 6),
            txn("2", TransactionType::Expense, TransactionCategory::Transport, 10.0, 2, 6),
            txn("3", TransactionType::Expense, TransactionCategory::Food, 10.0, 19, 6),
            txn("4", TransactionType::Expense, TransactionCategory::Health, 500.0, 2, 1),
        ]);
        let stats = SummaryService::statistics(&repo, StatsPeriod::Month);
        assert_eq!(stats.totals.expenses, 50.0);
        assert_eq!(stats.top_expenses.len(), 2);
        assert_eq!(stats.top_expenses[0].category, TransactionCategory::Food);
        assert_eq!(stats.top_expenses[0].share, 80.0);
        assert_eq!(
            stats.daily_expenses,
            vec![
                DailyTotal { date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), amount: 40.0 },
                DailyTotal { date: NaiveDate::from_ymd_opt(2024, 6, 19).unwrap(), amount: 10.0 },
            ]
        );

        let year = SummaryService::statistics(&repo, StatsPeriod::Year);
        assert_eq!(year.totals.expenses, 550.0);
        assert_eq!(year.top_expenses[0].category, TransactionCategory::Health);

        let week = SummaryService::statistics(&repo, StatsPeriod::Week);
        assert_eq!(week.totals.expenses, 10.0);
    }
}
