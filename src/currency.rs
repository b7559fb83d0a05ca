//! Currency codes
//!
//! Provider payloads key rates either by bare ISO 4217 codes (`EUR`) or by
//! six-letter pair codes (`USDEUR`). Both are reduced to [`CurrencyCode`],
//! which only ever holds exactly three upper-case ASCII letters.

use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currencies offered by the CLI when no explicit list is given.
pub const COMMON_CURRENCIES: [&str; 22] = [
    "GBP", "EUR", "USD", "CHF", "JPY", "AUD", "CAD", "NZD", "SEK", "NOK", "DKK", "PLN", "CZK",
    "HUF", "TRY", "ZAR", "CNY", "HKD", "SGD", "INR", "MXN", "BRL",
];

/// ISO 4217 style currency code
///
/// Ordering is lexicographic on the code, which is what fixes the column
/// order of an assembled series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// The provider's pivot currency.
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");

    /// Parse a bare code such as `eur` or `GBP`.
    pub fn parse(code: &str) -> Result<Self> {
        let bytes = code.trim().as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(FxError::InvalidCurrency(format!(
                "expected three letters, got {:?}",
                code
            )));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    /// Extract the target currency from a pair key such as `USDEUR`.
    ///
    /// Only six-letter keys are accepted; anything else would be mis-sliced.
    pub fn from_pair_key(key: &str) -> Result<Self> {
        if key.len() != 6 || !key.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(FxError::InvalidCurrency(format!(
                "expected a six-letter pair code, got {:?}",
                key
            )));
        }
        Self::parse(&key[3..])
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("")
    }

    /// Parse every entry of a list, failing on the first invalid one.
    pub fn parse_list<S: AsRef<str>>(codes: &[S]) -> Result<Vec<Self>> {
        codes.iter().map(|c| Self::parse(c.as_ref())).collect()
    }

    /// The common currency list as codes.
    pub fn common() -> Vec<Self> {
        COMMON_CURRENCIES
            .iter()
            .filter_map(|c| Self::parse(c).ok())
            .collect()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        assert_eq!(CurrencyCode::parse("eur").unwrap().as_str(), "EUR");
        assert_eq!(CurrencyCode::parse(" gbp ").unwrap().as_str(), "GBP");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(CurrencyCode::parse("EU").is_err());
        assert!(CurrencyCode::parse("EURO").is_err());
        assert!(CurrencyCode::parse("").is_err());
        assert!(CurrencyCode::parse("E1R").is_err());
    }

    #[test]
    fn test_pair_key_takes_last_three() {
        assert_eq!(CurrencyCode::from_pair_key("USDEUR").unwrap().as_str(), "EUR");
        assert_eq!(CurrencyCode::from_pair_key("usdgbp").unwrap().as_str(), "GBP");
    }

    #[test]
    fn test_pair_key_rejects_short_and_long_keys() {
        assert!(CurrencyCode::from_pair_key("EUR").is_err());
        assert!(CurrencyCode::from_pair_key("USDEU").is_err());
        assert!(CurrencyCode::from_pair_key("USDEURO").is_err());
        assert!(CurrencyCode::from_pair_key("USD-EU").is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut codes = CurrencyCode::parse_list(&["USD", "CHF", "EUR"]).unwrap();
        codes.sort();
        let names: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["CHF", "EUR", "USD"]);
    }

    #[test]
    fn test_serde_as_string() {
        let code = CurrencyCode::parse("JPY").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"JPY\"");
        let back: CurrencyCode = serde_json::from_str("\"jpy\"").unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<CurrencyCode>("\"JP\"").is_err());
    }

    #[test]
    fn test_common_currencies() {
        let common = CurrencyCode::common();
        assert_eq!(common.len(), COMMON_CURRENCIES.len());
        assert!(common.contains(&CurrencyCode::USD));
    }
}
