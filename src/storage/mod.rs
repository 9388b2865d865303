//! Key-value backends holding one JSON document per collection key.

pub mod json_backend;
pub mod memory;

use crate::errors::StoreResult;

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const PRODUCTS_KEY: &str = "products";
pub const SETTINGS_KEY: &str = "settings";
pub const WALLETS_KEY: &str = "wallets";
pub const GOALS_KEY: &str = "financial_goals";
pub const RECURRING_KEY: &str = "recurring_transactions";
pub const BUDGETS_KEY: &str = "budgets";

/// Every key the repository writes.
pub const ALL_KEYS: &[&str] = &[
    TRANSACTIONS_KEY,
    PRODUCTS_KEY,
    SETTINGS_KEY,
    WALLETS_KEY,
    GOALS_KEY,
    RECURRING_KEY,
    BUDGETS_KEY,
];

/// A flat string-keyed store of string values.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written or was removed.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes every listed key; absent keys are ignored.
    fn multi_remove(&self, keys: &[&str]) -> StoreResult<()>;
}
