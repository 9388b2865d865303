//! Operations spanning more than a single record write.

pub mod budget_service;
pub mod data_service;
pub mod goal_service;
pub mod recurring_service;
pub mod sales_service;
pub mod summary_service;

pub use budget_service::{BudgetAlert, BudgetService, BudgetStatus, ProgressLevel};
pub use data_service::DataService;
pub use goal_service::{GoalProgress, GoalService};
pub use recurring_service::RecurringService;
pub use sales_service::{SaleReceipt, SalesService};
pub use summary_service::{
    CategoryShare, DailyTotal, MonthlyOverview, Statistics, StatsPeriod, SummaryService, Totals,
};
