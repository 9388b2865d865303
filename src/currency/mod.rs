use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Datelike, Duration, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::Clock;

pub const DEFAULT_CURRENCY: &str = "USD";

/// ISO 4217 currency code carried as a tag; amounts are never converted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog entry for this code, if it is one of the supported currencies.
    pub fn info(&self) -> Option<&'static CurrencyInfo> {
        lookup(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", symbol: "$", name: "US Dollar" },
    CurrencyInfo { code: "EUR", symbol: "€", name: "Euro" },
    CurrencyInfo { code: "GBP", symbol: "£", name: "British Pound" },
    CurrencyInfo { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    CurrencyInfo { code: "MXN", symbol: "$", name: "Mexican Peso" },
    CurrencyInfo { code: "ARS", symbol: "$", name: "Argentine Peso" },
    CurrencyInfo { code: "COP", symbol: "$", name: "Colombian Peso" },
    CurrencyInfo { code: "CLP", symbol: "$", name: "Chilean Peso" },
    CurrencyInfo { code: "BRL", symbol: "R$", name: "Brazilian Real" },
    CurrencyInfo { code: "CAD", symbol: "$", name: "Canadian Dollar" },
    CurrencyInfo { code: "AUD", symbol: "$", name: "Australian Dollar" },
    CurrencyInfo { code: "CNY", symbol: "¥", name: "Chinese Yuan" },
    CurrencyInfo { code: "INR", symbol: "₹", name: "Indian Rupee" },
];

static BY_CODE: Lazy<HashMap<&'static str, &'static CurrencyInfo>> =
    Lazy::new(|| CURRENCIES.iter().map(|info| (info.code, info)).collect());

pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    BY_CODE.get(code.trim().to_uppercase().as_str()).copied()
}

pub fn is_supported(code: &str) -> bool {
    lookup(code).is_some()
}

/// Formats `amount` with the currency symbol, two decimals and `,` grouping.
pub fn format_currency(amount: f64, code: &CurrencyCode) -> String {
    let symbol = code.info().map(|info| info.symbol).unwrap_or("$");
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{symbol}{}.{decimals}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Human-friendly relative date: "Today", "Yesterday", otherwise `Mon D[, YYYY]`.
pub fn format_date(instant: DateTime<Utc>, clock: &dyn Clock) -> String {
    let date = clock.local_date(instant);
    let today = clock.today();
    if date == today {
        return "Today".into();
    }
    if date == today - Duration::days(1) {
        return "Yesterday".into();
    }
    if date.year() != today.year() {
        date.format("%b %-d, %Y").to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

/// Generates a record id of the form `[prefix_]<epoch millis>_<9 chars>`.
pub fn generate_id(prefix: Option<&str>, clock: &dyn Clock) -> String {
    let millis = clock.now().timestamp_millis();
    let entropy = Uuid::new_v4().simple().to_string();
    let suffix = &entropy[..9];
    match prefix {
        Some(prefix) => format!("{prefix}_{millis}_{suffix}"),
        None => format!("{millis}_{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn formats_with_symbol_and_grouping() {
        assert_eq!(format_currency(1234567.891, &"usd".into()), "$1,234,567.89");
        assert_eq!(format_currency(15.0, &"EUR".into()), "€15.00");
        assert_eq!(format_currency(999.5, &"BRL".into()), "R$999.50");
        assert_eq!(format_currency(-1000.0, &"GBP".into()), "-£1,000.00");
    }

    #[test]
    fn unknown_currency_falls_back_to_dollar_sign() {
        assert_eq!(format_currency(2.0, &"XYZ".into()), "$2.00");
        assert!(!is_supported("XYZ"));
        assert!(is_supported("inr"));
    }

    #[test]
    fn relative_dates() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        let today = Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 5, 9, 23, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        let last_year = Utc.with_ymd_and_hms(2023, 12, 25, 8, 0, 0).unwrap();
        assert_eq!(format_date(today, &clock), "Today");
        assert_eq!(format_date(yesterday, &clock), "Yesterday");
        assert_eq!(format_date(earlier, &clock), "Mar 2");
        assert_eq!(format_date(last_year, &clock), "Dec 25, 2023");
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let id = generate_id(Some("sale"), &clock);
        assert!(id.starts_with("sale_1704067200000_"));
        assert_eq!(id.len(), "sale_1704067200000_".len() + 9);
        assert_ne!(generate_id(None, &clock), generate_id(None, &clock));
    }
}
