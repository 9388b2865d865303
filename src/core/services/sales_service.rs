//! Product sales: stock decrement paired with a sale transaction.

use crate::currency::{generate_id, CurrencyCode};
use crate::domain::{Product, Transaction, TransactionCategory, TransactionType};
use crate::errors::{OperationError, OperationResult};
use crate::repository::Repository;
use crate::validation::ValidationError;

const SALE_ID_PREFIX: &str = "sale";

/// What a completed sale left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    pub product: Product,
    pub transaction: Transaction,
}

pub struct SalesService;

impl SalesService {
    /// Sells `quantity` units of a product and records the matching sale.
    ///
    /// The stock check and decrement run under the product collection lock, so
    /// concurrent sales cannot both spend the same units. The sale transaction is
    /// written afterwards; an undecodable transactions document is replaced
    /// rather than blocking the sale. If the store itself fails at that point
    /// the stock stays decremented and the storage error is returned.
    pub fn sell_product(
        repo: &Repository,
        product_id: &str,
        quantity: u32,
        currency: &CurrencyCode,
    ) -> OperationResult<SaleReceipt> {
        if quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity.into());
        }
        let now = repo.clock().now();

        let product = repo.products().modify(|products| {
            let product = products
                .iter_mut()
                .find(|product| product.id == product_id)
                .ok_or_else(|| OperationError::ProductNotFound(product_id.to_string()))?;
            if quantity > product.stock {
                return Err(OperationError::InsufficientStock {
                    requested: quantity,
                    available: product.stock,
                });
            }
            product.stock -= quantity;
            product.updated_at = now;
            Ok::<_, OperationError>(product.clone())
        })?;

        let transaction = Transaction::new(
            generate_id(Some(SALE_ID_PREFIX), repo.clock()),
            TransactionType::Sale,
            product.price * f64::from(quantity),
            currency.clone(),
            TransactionCategory::Sale,
            now,
        )
        .with_description(format!("Venta de {quantity}x {}", product.name))
        .with_product(product.id.clone());

        if let Err(err) = repo.transactions().save(&transaction) {
            tracing::error!(
                product_id,
                quantity,
                error = %err,
                "stock decremented but the sale transaction was not recorded"
            );
            return Err(err.into());
        }

        tracing::info!(
            product_id,
            quantity,
            remaining = product.stock,
            amount = transaction.amount,
            "product sold"
        );
        Ok(SaleReceipt {
            product,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::time::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn repo_with_product(stock: u32) -> Repository {
        let now = Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap();
        let repo = Repository::new(Arc::new(MemoryStore::new()), Arc::new(FixedClock::new(now)));
        let product = Product::new("p1", "Candle", 5.0, "USD".into(), stock, now);
        repo.products().save(&product).unwrap();
        repo
    }

    #[test]
    fn sale_decrements_stock_and_records_transaction() {
        let repo = repo_with_product(10);
        let receipt = SalesService::sell_product(&repo, "p1", 3, &"USD".into()).unwrap();
        assert_eq!(receipt.product.stock, 7);
        assert_eq!(receipt.transaction.amount, 15.0);
        assert_eq!(receipt.transaction.description, "Venta de 3x Candle");
        assert!(receipt.transaction.id.starts_with("sale_"));
        assert_eq!(repo.product_by_id("p1").unwrap().stock, 7);
        assert_eq!(repo.transactions().all(), vec![receipt.transaction]);
    }

    #[test]
    fn zero_quantity_is_rejected_before_touching_storage() {
        let repo = repo_with_product(2);
        let err = SalesService::sell_product(&repo, "p1", 0, &"USD".into()).unwrap_err();
        assert!(matches!(
            err,
            OperationError::Validation(ValidationError::NonPositiveQuantity)
        ));
        assert_eq!(repo.product_by_id("p1").unwrap().stock, 2);
    }

    #[test]
    fn malformed_transactions_document_does_not_orphan_sales() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap();
        let repo = Repository::new(store.clone(), Arc::new(FixedClock::new(now)));
        let product = Product::new("p1", "Candle", 5.0, "USD".into(), 10, now);
        repo.products().save(&product).unwrap();
        store.insert_raw(crate::storage::TRANSACTIONS_KEY, "{broken");

        for _ in 0..3 {
            SalesService::sell_product(&repo, "p1", 1, &"USD".into()).unwrap();
        }

        assert_eq!(repo.product_by_id("p1").unwrap().stock, 7);
        let sales = repo.transactions().all();
        assert_eq!(sales.len(), 3);
        assert!(sales
            .iter()
            .all(|txn| txn.product_id.as_deref() == Some("p1")));
    }

    #[test]
    fn unavailable_store_rejects_the_sale() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap();
        let repo = Repository::new(store.clone(), Arc::new(FixedClock::new(now)));
        let product = Product::new("p1", "Candle", 5.0, "USD".into(), 4, now);
        repo.products().save(&product).unwrap();
        store.set_unavailable(true);

        let err = SalesService::sell_product(&repo, "p1", 1, &"USD".into()).unwrap_err();
        assert!(matches!(err, OperationError::Storage(_)));
        store.set_unavailable(false);
        assert_eq!(repo.product_by_id("p1").unwrap().stock, 4);
    }
}
