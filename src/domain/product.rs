use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Identifiable, NamedEntity};
use crate::currency::CurrencyCode;

/// An item kept in inventory and sold through sale transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub currency: CurrencyCode,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        currency: CurrencyCode,
        stock: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            currency,
            stock,
            cost: None,
            category: String::new(),
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Profit per unit when a cost is known.
    pub fn unit_margin(&self) -> Option<f64> {
        self.cost.map(|cost| self.price - cost)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Identifiable for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Product {
    fn name(&self) -> &str {
        &self.name
    }
}
