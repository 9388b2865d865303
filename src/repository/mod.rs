//! Typed collections over a [`KeyValueStore`], one JSON array per key.
//!
//! Every read-modify-write holds the collection's mutex for the whole cycle so
//! two writers on the same collection never interleave. Reads degrade to empty
//! collections or defaults; writes propagate [`StoreError`].

mod collection;
mod export;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::{
    domain::{
        AppSettings, Budget, FinancialGoal, Product, RecurringTransaction, Transaction,
        TransactionCategory, TransactionType, Wallet,
    },
    errors::StoreResult,
    storage::{
        KeyValueStore, BUDGETS_KEY, GOALS_KEY, PRODUCTS_KEY, RECURRING_KEY, SETTINGS_KEY,
        TRANSACTIONS_KEY, WALLETS_KEY,
    },
    time::Clock,
};

pub use collection::Collection;
pub use export::{ExportEnvelope, ImportSummary};

/// Summed amount for one category, as produced by [`Repository::top_categories`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: TransactionCategory,
    pub total: f64,
}

#[derive(Debug, Default)]
struct CollectionLocks {
    transactions: Mutex<()>,
    products: Mutex<()>,
    settings: Mutex<()>,
    wallets: Mutex<()>,
    goals: Mutex<()>,
    recurring: Mutex<()>,
    budgets: Mutex<()>,
}

/// Sole owner and writer of the persisted collections.
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    locks: CollectionLocks,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: CollectionLocks::default(),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn transactions(&self) -> Collection<'_, Transaction> {
        Collection::new(self.store.as_ref(), TRANSACTIONS_KEY, &self.locks.transactions)
    }

    pub fn products(&self) -> Collection<'_, Product> {
        Collection::new(self.store.as_ref(), PRODUCTS_KEY, &self.locks.products)
    }

    /// Wallets seed a default cash wallet the first time the key is read.
    pub fn wallets(&self) -> Collection<'_, Wallet> {
        Collection::new(self.store.as_ref(), WALLETS_KEY, &self.locks.wallets)
            .with_seed(vec![Wallet::default_cash(self.clock.now())])
    }

    pub fn goals(&self) -> Collection<'_, FinancialGoal> {
        Collection::new(self.store.as_ref(), GOALS_KEY, &self.locks.goals)
    }

    pub fn recurring(&self) -> Collection<'_, RecurringTransaction> {
        Collection::new(self.store.as_ref(), RECURRING_KEY, &self.locks.recurring)
    }

    pub fn budgets(&self) -> Collection<'_, Budget> {
        Collection::new(self.store.as_ref(), BUDGETS_KEY, &self.locks.budgets)
    }

    /// Returns the settings record, creating and persisting the default on
    /// first access. Any failure yields the default without raising.
    pub fn settings(&self) -> AppSettings {
        let _guard = collection::lock(&self.locks.settings);
        match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "settings record is malformed, using defaults");
                AppSettings::default()
            }),
            Ok(None) => {
                let defaults = AppSettings::default();
                if let Err(err) = self.write_settings(&defaults) {
                    tracing::warn!(error = %err, "could not persist default settings");
                }
                defaults
            }
            Err(err) => {
                tracing::warn!(error = %err, "settings unavailable, using defaults");
                AppSettings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &AppSettings) -> StoreResult<()> {
        let _guard = collection::lock(&self.locks.settings);
        self.write_settings(settings)
    }

    fn write_settings(&self, settings: &AppSettings) -> StoreResult<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &json)
    }

    /// Transactions whose date falls within `[start, end]`.
    pub fn transactions_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Transaction> {
        self.transactions()
            .all()
            .into_iter()
            .filter(|txn| txn.date >= start && txn.date <= end)
            .collect()
    }

    pub fn transactions_by_category(&self, category: TransactionCategory) -> Vec<Transaction> {
        self.transactions()
            .all()
            .into_iter()
            .filter(|txn| txn.category == category)
            .collect()
    }

    /// Sums transactions of `kind` per category, largest first. Equal totals keep
    /// the order in which their categories first appear.
    pub fn top_categories(&self, kind: TransactionType, limit: usize) -> Vec<CategoryTotal> {
        rank_categories(
            self.transactions()
                .all()
                .iter()
                .filter(|txn| txn.kind == kind),
            limit,
        )
    }

    pub fn product_by_id(&self, id: &str) -> Option<Product> {
        self.products().find(id)
    }

    /// Removes the transaction and product collections. Everything else survives.
    pub fn clear_all_data(&self) -> StoreResult<()> {
        let _transactions = collection::lock(&self.locks.transactions);
        let _products = collection::lock(&self.locks.products);
        self.store
            .multi_remove(&[TRANSACTIONS_KEY, PRODUCTS_KEY])
            .map_err(|err| {
                tracing::error!(error = %err, "failed to clear data");
                err
            })?;
        tracing::info!("cleared transactions and products");
        Ok(())
    }
}

pub(crate) fn rank_categories<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
    limit: usize,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for txn in transactions {
        match totals.iter_mut().find(|entry| entry.category == txn.category) {
            Some(entry) => entry.total += txn.amount,
            None => totals.push(CategoryTotal {
                category: txn.category,
                total: txn.amount,
            }),
        }
    }
    // Stable sort keeps first-occurrence order for ties.
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(limit);
    totals
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::MemoryStore, time::FixedClock};
    use chrono::TimeZone;

    fn repo_with_store() -> (Repository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap());
        (Repository::new(store.clone(), Arc::new(clock)), store)
    }

    fn expense(id: &str, category: TransactionCategory, amount: f64) -> Transaction {
        Transaction::new(
            id,
            TransactionType::Expense,
            amount,
            "USD".into(),
            category,
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn settings_default_is_persisted_on_first_read() {
        let (repo, store) = repo_with_store();
        assert!(!store.contains(SETTINGS_KEY));
        let settings = repo.settings();
        assert_eq!(settings, AppSettings::default());
        assert!(store.contains(SETTINGS_KEY));
    }

    #[test]
    fn settings_fall_back_to_defaults_when_store_fails() {
        let (repo, store) = repo_with_store();
        store.set_unavailable(true);
        assert_eq!(repo.settings(), AppSettings::default());
        assert!(repo.save_settings(&AppSettings::default()).is_err());
    }

    #[test]
    fn wallets_are_seeded_once() {
        let (repo, store) = repo_with_store();
        let wallets = repo.wallets().all();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].id, crate::domain::DEFAULT_WALLET_ID);
        assert_eq!(wallets[0].name, "Efectivo");
        assert!(store.contains(WALLETS_KEY));

        repo.wallets().delete_by_id("wallet_default").unwrap();
        assert!(repo.wallets().all().is_empty(), "an empty stored list is not reseeded");
    }

    #[test]
    fn malformed_collection_reads_as_empty_and_is_replaced_on_write() {
        let (repo, store) = repo_with_store();
        store.insert_raw(TRANSACTIONS_KEY, "{not json");
        assert!(repo.transactions().all().is_empty());
        repo.transactions()
            .save(&expense("t1", TransactionCategory::Food, 1.0))
            .unwrap();
        let stored = repo.transactions().all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "t1");
    }

    #[test]
    fn unavailable_store_still_fails_writes() {
        let (repo, store) = repo_with_store();
        store.set_unavailable(true);
        let err = repo
            .transactions()
            .save(&expense("t1", TransactionCategory::Food, 1.0))
            .unwrap_err();
        assert!(matches!(err, crate::errors::StoreError::Unavailable(_)));
    }

    #[test]
    fn top_categories_rank_by_total_and_keep_first_seen_order_on_ties() {
        let (repo, _store) = repo_with_store();
        let items = vec![
            expense("1", TransactionCategory::Health, 7.0),
            expense("2", TransactionCategory::Food, 4.0),
            expense("3", TransactionCategory::Shopping, 20.0),
            expense("4", TransactionCategory::Food, 3.0),
        ];
        repo.transactions().replace_all(&items).unwrap();
        let top = repo.top_categories(TransactionType::Expense, 3);
        assert_eq!(
            top,
            vec![
                CategoryTotal { category: TransactionCategory::Shopping, total: 20.0 },
                CategoryTotal { category: TransactionCategory::Health, total: 7.0 },
                CategoryTotal { category: TransactionCategory::Food, total: 7.0 },
            ]
        );
        assert!(repo.top_categories(TransactionType::Income, 5).is_empty());
    }

    #[test]
    fn clear_all_data_keeps_other_collections() {
        let (repo, store) = repo_with_store();
        repo.transactions()
            .save(&expense("t1", TransactionCategory::Food, 1.0))
            .unwrap();
        repo.wallets().all();
        repo.clear_all_data().unwrap();
        assert!(!store.contains(TRANSACTIONS_KEY));
        assert!(store.contains(WALLETS_KEY));
    }
}
