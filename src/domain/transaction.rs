use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::TransactionCategory;
use super::common::{string_enum, Identifiable};
use crate::currency::CurrencyCode;

string_enum! {
    pub enum TransactionType("transaction type") {
        Income => "income",
        Expense => "expense",
        Sale => "sale",
    }
}

/// A single money movement. Records are append-only in practice; edits replace
/// the whole record by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub category: TransactionCategory,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionType,
        amount: f64,
        currency: CurrencyCode,
        category: TransactionCategory,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            currency,
            category,
            description: String::new(),
            date,
            product_id: None,
            wallet_id: None,
            notes: None,
            tags: None,
            recurring: None,
            recurring_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Links the transaction to the product it was generated from.
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_wallet(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = Some(wallet_id.into());
        self
    }

    pub fn is_sale(&self) -> bool {
        self.kind == TransactionType::Sale
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}
