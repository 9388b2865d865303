use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::TransactionCategory;
use super::common::{string_enum, Identifiable};
use super::transaction::TransactionType;
use crate::currency::CurrencyCode;

string_enum! {
    pub enum Frequency("frequency") {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

/// A recurring income or expense definition. Only stored and toggled; nothing
/// turns a due definition into a real transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub category: TransactionCategory,
    #[serde(default)]
    pub description: String,
    pub frequency: Frequency,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_executed: Option<DateTime<Utc>>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
}

impl RecurringTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        kind: TransactionType,
        amount: f64,
        currency: CurrencyCode,
        category: TransactionCategory,
        description: impl Into<String>,
        frequency: Frequency,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            currency,
            category,
            description: description.into(),
            frequency,
            start_date,
            end_date: None,
            last_executed: None,
            active: true,
            wallet_id: None,
        }
    }

    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

impl Identifiable for RecurringTransaction {
    fn id(&self) -> &str {
        &self.id
    }
}
