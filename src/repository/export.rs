use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{AppSettings, Product, Transaction},
    errors::StoreResult,
};

use super::Repository;

/// Backup document. Wallets, goals, recurring definitions and budgets are not
/// part of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub transactions: Vec<Transaction>,
    pub products: Vec<Product>,
    pub settings: AppSettings,
    pub export_date: DateTime<Utc>,
}

/// Import reads only the collections it restores; other top-level fields are
/// ignored and a missing or `null` collection leaves the stored one alone.
#[derive(Debug, Deserialize)]
struct ImportEnvelope {
    #[serde(default)]
    transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    products: Option<Vec<Product>>,
}

/// Record counts written by an import; `None` means the collection was skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub transactions: Option<usize>,
    pub products: Option<usize>,
}

impl Repository {
    pub fn export_envelope(&self) -> ExportEnvelope {
        ExportEnvelope {
            transactions: self.transactions().all(),
            products: self.products().all(),
            settings: self.settings(),
            export_date: self.clock().now(),
        }
    }

    /// Serializes transactions, products and settings as one JSON document.
    pub fn export_data(&self) -> StoreResult<String> {
        let json = serde_json::to_string(&self.export_envelope())?;
        tracing::info!(bytes = json.len(), "exported data");
        Ok(json)
    }

    /// Overwrites transactions and products with the document's content.
    ///
    /// The whole document is decoded before anything is written, so a single
    /// malformed record rejects the import and leaves storage untouched.
    pub fn import_data(&self, json: &str) -> StoreResult<ImportSummary> {
        let envelope: ImportEnvelope = serde_json::from_str(json).map_err(|err| {
            tracing::warn!(error = %err, "rejected import document");
            err
        })?;

        let mut summary = ImportSummary::default();
        if let Some(transactions) = envelope.transactions {
            self.transactions().replace_all(&transactions)?;
            summary.transactions = Some(transactions.len());
        }
        if let Some(products) = envelope.products {
            self.products().replace_all(&products)?;
            summary.products = Some(products.len());
        }
        tracing::info!(
            transactions = ?summary.transactions,
            products = ?summary.products,
            "imported data"
        );
        Ok(summary)
    }
}

