//! Input validation for values typed by the user before they reach any collection.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use thiserror::Error;

const MAX_AMOUNT: f64 = 999_999_999.0;
const MAX_STOCK: i64 = 1_000_000;
const MAX_SANITIZED_LEN: usize = 200;
const MAX_YEARS_PAST: i32 = 100;
const MAX_YEARS_FUTURE: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount is required")]
    AmountRequired,
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Amount cannot be negative")]
    NegativeAmount,
    #[error("Amount is too large")]
    AmountTooLarge,
    #[error("Amount must be greater than zero")]
    ZeroAmount,
    #[error("Maximum 2 decimal places allowed")]
    TooManyDecimals,
    #[error("Stock is required")]
    StockRequired,
    #[error("Invalid stock")]
    InvalidStock,
    #[error("Stock cannot be negative")]
    NegativeStock,
    #[error("Stock is too large")]
    StockTooLarge,
    #[error("Quantity is required")]
    QuantityRequired,
    #[error("Invalid quantity")]
    InvalidQuantity,
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,
    #[error("Only {0} units available")]
    QuantityExceedsStock(u32),
    #[error("{0} is required")]
    TextRequired(String),
    #[error("{field} must be at least {min} characters")]
    TextTooShort { field: String, min: usize },
    #[error("{field} must be less than {max} characters")]
    TextTooLong { field: String, max: usize },
    #[error("Invalid date")]
    InvalidDate,
    #[error("Date is too far in the past")]
    DateTooOld,
    #[error("Date is too far in the future")]
    DateTooFarAhead,
    #[error("PIN must be exactly 4 digits")]
    InvalidPin,
    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
}

/// Parses a monetary amount typed by the user.
pub fn validate_amount(value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::AmountRequired);
    }
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidAmount)?;
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount);
    }
    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }
    if amount == 0.0 {
        return Err(ValidationError::ZeroAmount);
    }
    if let Some((_, decimals)) = trimmed.split_once('.') {
        if decimals.len() > 2 {
            return Err(ValidationError::TooManyDecimals);
        }
    }
    Ok(amount)
}

/// Parses a stock level; zero is allowed.
pub fn validate_stock(value: &str) -> Result<u32, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::StockRequired);
    }
    let stock: i64 = trimmed.parse().map_err(|_| ValidationError::InvalidStock)?;
    if stock < 0 {
        return Err(ValidationError::NegativeStock);
    }
    if stock > MAX_STOCK {
        return Err(ValidationError::StockTooLarge);
    }
    Ok(stock as u32)
}

/// Parses a sale quantity against the units currently in stock.
pub fn validate_quantity(value: &str, max_stock: u32) -> Result<u32, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::QuantityRequired);
    }
    let quantity: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity)?;
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    if quantity > i64::from(max_stock) {
        return Err(ValidationError::QuantityExceedsStock(max_stock));
    }
    Ok(quantity as u32)
}

/// Checks a required free-text field and returns it trimmed.
pub fn validate_text(
    value: &str,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TextRequired(field.to_string()));
    }
    let len = trimmed.chars().count();
    if len < min_len {
        return Err(ValidationError::TextTooShort {
            field: field.to_string(),
            min: min_len,
        });
    }
    if len > max_len {
        return Err(ValidationError::TextTooLong {
            field: field.to_string(),
            max: max_len,
        });
    }
    Ok(trimmed.to_string())
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC) within
/// a plausible window around `now`.
pub fn validate_date(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ValidationError> {
    let date = parse_date(value).ok_or(ValidationError::InvalidDate)?;
    let oldest = shift_years(now, -MAX_YEARS_PAST);
    let latest = shift_years(now, MAX_YEARS_FUTURE);
    if date < oldest {
        return Err(ValidationError::DateTooOld);
    }
    if date > latest {
        return Err(ValidationError::DateTooFarAhead);
    }
    Ok(date)
}

/// Accepts exactly four ASCII digits.
pub fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPin)
    }
}

/// Trims, strips angle brackets and caps the length.
pub fn sanitize_text(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .take(MAX_SANITIZED_LEN)
        .collect()
}

pub fn sanitize_number(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Normalizes partially typed amounts: one decimal point, two decimals at most.
pub fn format_input_amount(value: &str) -> String {
    let cleaned = sanitize_number(value);
    let mut parts = cleaned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    match parts.next() {
        Some(rest) => {
            let decimals: String = rest.chars().filter(|c| *c != '.').take(2).collect();
            format!("{whole}.{decimals}")
        }
        None => whole.to_string(),
    }
}

pub(crate) fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn shift_years(instant: DateTime<Utc>, years: i32) -> DateTime<Utc> {
    let target = instant.year() + years;
    instant
        .with_year(target)
        // Feb 29 has no counterpart in most years.
        .or_else(|| (instant - chrono::Duration::days(1)).with_year(target))
        .unwrap_or(instant)
}
