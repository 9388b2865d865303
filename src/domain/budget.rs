use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::TransactionCategory;
use super::common::{string_enum, Identifiable};
use crate::currency::CurrencyCode;

string_enum! {
    pub enum BudgetPeriod("budget period") {
        Weekly => "weekly",
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

/// A spending limit for one category. Spending is always derived from
/// transactions at read time and never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: TransactionCategory,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(
        id: impl Into<String>,
        category: TransactionCategory,
        amount: f64,
        currency: CurrencyCode,
        period: BudgetPeriod,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            amount,
            currency,
            period,
            created_at,
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}
