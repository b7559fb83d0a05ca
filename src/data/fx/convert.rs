//! Base converter - re-express a day's pivot-relative values in a chosen base

use super::quote::DayQuote;
use crate::currency::CurrencyCode;
use std::collections::BTreeMap;

/// One day's values expressed in the base currency
///
/// The base entry is exactly 1.0. A USD entry is present unless its
/// quotient overflowed.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseRow {
    base: CurrencyCode,
    values: BTreeMap<CurrencyCode, f64>,
    /// Quotients dropped because they were not finite
    dropped: usize,
}

impl BaseRow {
    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    pub fn get(&self, code: CurrencyCode) -> Option<f64> {
        self.values.get(&code).copied()
    }

    pub fn codes(&self) -> impl Iterator<Item = CurrencyCode> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        self.values.iter().map(|(code, value)| (*code, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Convert a day's quote into `base` terms.
///
/// Returns `None` when the base is not quoted that day; the caller drops the
/// day. Both operands are pivot→currency, so `quote[c] / quote[base]` is
/// base→currency.
pub fn to_base(quote: &DayQuote, base: CurrencyCode) -> Option<BaseRow> {
    let base_value = quote.get(base)?;

    let mut values = BTreeMap::new();
    let mut dropped = 0;
    for (code, value) in quote.iter() {
        let converted = value / base_value;
        if converted.is_finite() {
            values.insert(code, converted);
        } else if code != base {
            log::debug!("Dropping {}: {} / {} is not finite", code, value, base_value);
            dropped += 1;
        }
    }

    values.insert(base, 1.0);
    if !quote.contains(CurrencyCode::USD) {
        let usd = 1.0 / base_value;
        if usd.is_finite() {
            values.insert(CurrencyCode::USD, usd);
        } else {
            dropped += 1;
        }
    }

    Some(BaseRow {
        base,
        values,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    fn quote(entries: &[(&str, f64)]) -> DayQuote {
        entries.iter().map(|(c, v)| (code(c), *v)).collect()
    }

    #[test]
    fn test_gbp_base() {
        let row = to_base(&quote(&[("EUR", 0.90), ("GBP", 0.78), ("USD", 1.0)]), code("GBP")).unwrap();

        assert_eq!(row.get(code("GBP")), Some(1.0));
        assert_relative_eq!(row.get(code("EUR")).unwrap(), 0.90 / 0.78);
        assert_relative_eq!(row.get(code("USD")).unwrap(), 1.0 / 0.78);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_usd_added_when_not_quoted() {
        let row = to_base(&quote(&[("EUR", 0.90), ("GBP", 0.78)]), code("GBP")).unwrap();
        assert_relative_eq!(row.get(code("USD")).unwrap(), 1.0 / 0.78);
    }

    #[test]
    fn test_usd_base() {
        let row = to_base(&quote(&[("EUR", 0.90), ("USD", 1.0)]), CurrencyCode::USD).unwrap();
        assert_eq!(row.get(CurrencyCode::USD), Some(1.0));
        assert_relative_eq!(row.get(code("EUR")).unwrap(), 0.90);
    }

    #[test]
    fn test_base_is_exactly_one() {
        // 0.1 + 0.2 style values where self-division could drift
        let row = to_base(&quote(&[("JPY", 0.1 + 0.2), ("EUR", 0.9)]), code("JPY")).unwrap();
        assert_eq!(row.get(code("JPY")).unwrap().to_bits(), 1.0f64.to_bits());
    }

    #[test]
    fn test_overflowing_quotients_dropped() {
        let row = to_base(&quote(&[("GBP", 1e-320), ("EUR", 0.9), ("JPY", 140.0)]), code("GBP")).unwrap();

        assert_eq!(row.get(code("GBP")), Some(1.0));
        assert_eq!(row.get(code("EUR")), None);
        assert_eq!(row.get(code("JPY")), None);
        assert_eq!(row.get(CurrencyCode::USD), None);
        assert_eq!(row.dropped(), 3);
        assert!(row.iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn test_missing_base_is_none() {
        assert!(to_base(&quote(&[("EUR", 0.90)]), code("GBP")).is_none());
        assert!(to_base(&DayQuote::new(), code("GBP")).is_none());
    }
}
