//! PIN digests.
//!
//! Current format is `v1$<salt>$<hex>`: BLAKE3 in key-derivation mode over the
//! salt and PIN, re-hashed for a fixed number of rounds. Older installs stored
//! the decimal output of a 32-bit rolling hash; those are still recognised so
//! they can be upgraded after a successful unlock.

use subtle::ConstantTimeEq;
use uuid::Uuid;

const VERSION_TAG: &str = "v1";
const SEPARATOR: char = '$';
const DERIVE_CONTEXT: &str = "cartera 2024-05 pin digest v1";
const ROUNDS: u32 = 20_000;

/// Outcome of checking a PIN against a stored digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCheck {
    Match,
    /// Matched a digest in the legacy format; the caller should re-store it.
    LegacyMatch,
    Mismatch,
}

impl PinCheck {
    pub fn is_match(self) -> bool {
        !matches!(self, PinCheck::Mismatch)
    }
}

/// Digests `pin` under a fresh random salt.
pub fn digest(pin: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    digest_with_salt(pin, &salt)
}

/// Deterministic digest for a given salt.
pub fn digest_with_salt(pin: &str, salt: &str) -> String {
    let mut hasher = blake3::Hasher::new_derive_key(DERIVE_CONTEXT);
    hasher.update(salt.as_bytes());
    hasher.update(pin.as_bytes());
    let mut output = hasher.finalize();
    for _ in 1..ROUNDS {
        let mut round = blake3::Hasher::new_derive_key(DERIVE_CONTEXT);
        round.update(output.as_bytes());
        round.update(salt.as_bytes());
        output = round.finalize();
    }
    format!("{VERSION_TAG}{SEPARATOR}{salt}{SEPARATOR}{}", output.to_hex())
}

/// 32-bit multiply-by-31 rolling hash over UTF-16 code units, as decimal.
pub fn legacy_digest(pin: &str) -> String {
    pin.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .to_string()
}

pub fn is_legacy(stored: &str) -> bool {
    !stored.starts_with(VERSION_TAG) || !stored.contains(SEPARATOR)
}

/// Compares `pin` against `stored` in constant time for equal-length inputs.
pub fn verify(pin: &str, stored: &str) -> PinCheck {
    if is_legacy(stored) {
        return if constant_eq(&legacy_digest(pin), stored) {
            PinCheck::LegacyMatch
        } else {
            PinCheck::Mismatch
        };
    }
    let mut parts = stored.splitn(3, SEPARATOR);
    let (Some(VERSION_TAG), Some(salt), Some(_)) = (parts.next(), parts.next(), parts.next()) else {
        return PinCheck::Mismatch;
    };
    if constant_eq(&digest_with_salt(pin, salt), stored) {
        PinCheck::Match
    } else {
        PinCheck::Mismatch
    }
}

fn constant_eq(left: &str, right: &str) -> bool {
    left.as_bytes().ct_eq(right.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_digest_matches_known_values() {
        assert_eq!(legacy_digest("1234"), "1509442");
        assert_eq!(legacy_digest("0000"), "1477632");
        assert_eq!(legacy_digest(""), "0");
    }

    #[test]
    fn digests_are_salted() {
        let first = digest("1234");
        let second = digest("1234");
        assert_ne!(first, second);
        assert!(first.starts_with("v1$"));
        assert_eq!(verify("1234", &first), PinCheck::Match);
        assert_eq!(verify("1234", &second), PinCheck::Match);
        assert_eq!(verify("4321", &first), PinCheck::Mismatch);
    }

    #[test]
    fn same_salt_is_deterministic() {
        assert_eq!(
            digest_with_salt("2468", "abc"),
            digest_with_salt("2468", "abc")
        );
        assert_ne!(
            digest_with_salt("2468", "abc"),
            digest_with_salt("2468", "abd")
        );
    }

    #[test]
    fn legacy_values_are_recognised() {
        assert_eq!(verify("1234", "1509442"), PinCheck::LegacyMatch);
        assert_eq!(verify("0000", "1509442"), PinCheck::Mismatch);
        assert_eq!(verify("1234", "v1$broken"), PinCheck::Mismatch);
    }
}
