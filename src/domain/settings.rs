use serde::{Deserialize, Serialize};

use super::common::string_enum;
use crate::currency::CurrencyCode;

string_enum! {
    pub enum Language("language") {
        Es => "es",
        En => "en",
    }
}

string_enum! {
    pub enum ThemePreference("theme") {
        Light => "light",
        Dark => "dark",
        Auto => "auto",
    }
}

string_enum! {
    pub enum CloudProvider("cloud provider") {
        Drive => "drive",
        ICloud => "icloud",
    }
}

/// Singleton user preferences stored alongside the collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub language: Language,
    pub currency: CurrencyCode,
    pub theme: ThemePreference,
    #[serde(default)]
    pub cloud_sync: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<CloudProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biometrics_enabled: Option<bool>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::Es,
            currency: CurrencyCode::default(),
            theme: ThemePreference::Auto,
            cloud_sync: false,
            cloud_provider: None,
            default_wallet: None,
            biometrics_enabled: None,
        }
    }
}
