//! Record types stored in the key-value namespace.

pub mod budget;
pub mod category;
pub mod common;
pub mod goal;
pub mod product;
pub mod recurring;
pub mod settings;
pub mod transaction;
pub mod wallet;

pub use budget::{Budget, BudgetPeriod};
pub use category::{CategoryIcon, CategoryInfo, TransactionCategory, DEFAULT_CATEGORIES};
pub use common::{Identifiable, NamedEntity};
pub use goal::{FinancialGoal, GoalCategory};
pub use product::Product;
pub use recurring::{Frequency, RecurringTransaction};
pub use settings::{AppSettings, CloudProvider, Language, ThemePreference};
pub use transaction::{Transaction, TransactionType};
pub use wallet::{Wallet, WalletIcon, WalletKind, DEFAULT_WALLET_ID};
