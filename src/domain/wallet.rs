use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{string_enum, Identifiable, NamedEntity};
use crate::currency::CurrencyCode;

pub const DEFAULT_WALLET_ID: &str = "wallet_default";
const DEFAULT_WALLET_NAME: &str = "Efectivo";
const DEFAULT_WALLET_COLOR: &str = "#4ECDC4";

string_enum! {
    pub enum WalletKind("wallet type") {
        Cash => "cash",
        Bank => "bank",
        Card => "card",
        Savings => "savings",
        Other => "other",
    }
}

string_enum! {
    pub enum WalletIcon("wallet icon") {
        Wallet => "wallet",
        Cash => "cash",
        Card => "card",
        Business => "business",
        TrendingUp => "trending-up",
        EllipsisHorizontal => "ellipsis-horizontal",
    }
}

impl WalletKind {
    pub fn default_icon(&self) -> WalletIcon {
        match self {
            WalletKind::Cash => WalletIcon::Cash,
            WalletKind::Bank => WalletIcon::Business,
            WalletKind::Card => WalletIcon::Card,
            WalletKind::Savings => WalletIcon::TrendingUp,
            WalletKind::Other => WalletIcon::EllipsisHorizontal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WalletKind,
    pub balance: f64,
    pub currency: CurrencyCode,
    pub color: String,
    pub icon: WalletIcon,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: WalletKind,
        currency: CurrencyCode,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            balance: 0.0,
            currency,
            color: DEFAULT_WALLET_COLOR.into(),
            icon: kind.default_icon(),
            created_at,
        }
    }

    /// The cash wallet materialized when no wallets have been stored yet.
    pub fn default_cash(created_at: DateTime<Utc>) -> Self {
        Self {
            icon: WalletIcon::Wallet,
            ..Self::new(
                DEFAULT_WALLET_ID,
                DEFAULT_WALLET_NAME,
                WalletKind::Cash,
                CurrencyCode::default(),
                created_at,
            )
        }
    }
}

impl Identifiable for Wallet {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Wallet {
    fn name(&self) -> &str {
        &self.name
    }
}
