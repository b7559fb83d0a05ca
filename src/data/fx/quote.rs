//! Quote parser - one day's raw record into pivot-relative values

use super::payload::WireSchema;
use crate::currency::CurrencyCode;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A day's rates, every value relative to the provider pivot (USD)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayQuote {
    values: BTreeMap<CurrencyCode, f64>,
}

impl DayQuote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pivot-relative value. Non-positive or non-finite values are ignored.
    pub fn insert(&mut self, code: CurrencyCode, value: f64) -> bool {
        if !value.is_finite() || value <= 0.0 {
            return false;
        }
        self.values.insert(code, value);
        true
    }

    pub fn get(&self, code: CurrencyCode) -> Option<f64> {
        self.values.get(&code).copied()
    }

    pub fn contains(&self, code: CurrencyCode) -> bool {
        self.values.contains_key(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        self.values.iter().map(|(code, value)| (*code, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A day with no entries counts as absent data.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(CurrencyCode, f64)> for DayQuote {
    fn from_iter<I: IntoIterator<Item = (CurrencyCode, f64)>>(iter: I) -> Self {
        let mut quote = DayQuote::new();
        for (code, value) in iter {
            quote.insert(code, value);
        }
        quote
    }
}

/// Result of parsing one day's record
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDay {
    pub quote: DayQuote,
    /// Entries dropped for a malformed key or an unusable value
    pub skipped: usize,
}

/// Parse one day's record under the given wire schema.
///
/// A record nested one level under `rates`/`quotes` is unwrapped first.
/// Records that are not objects parse to an empty quote.
pub fn parse_day(record: &Value, schema: WireSchema) -> ParsedDay {
    let Some(entries) = unwrap_record(record) else {
        log::debug!("Day record is not an object: {}", record);
        return ParsedDay {
            quote: DayQuote::new(),
            skipped: 0,
        };
    };

    let mut quote = DayQuote::new();
    let mut skipped = 0;

    for (key, raw) in entries {
        let code = match schema {
            WireSchema::PairCode => CurrencyCode::from_pair_key(key),
            WireSchema::BareCode => CurrencyCode::parse(key),
        };
        let code = match code {
            Ok(code) => code,
            Err(e) => {
                log::debug!("Skipping entry {:?}: {}", key, e);
                skipped += 1;
                continue;
            }
        };

        let inserted = coerce_rate(raw).map_or(false, |value| quote.insert(code, value));
        if !inserted {
            log::debug!("Skipping entry {:?}: unusable value {}", key, raw);
            skipped += 1;
        }
    }

    ParsedDay { quote, skipped }
}

fn unwrap_record(record: &Value) -> Option<&Map<String, Value>> {
    let entries = record.as_object()?;
    for nested_key in ["quotes", "rates"] {
        if let Some(Value::Object(inner)) = entries.get(nested_key) {
            return Some(inner);
        }
    }
    Some(entries)
}

/// Coerce a JSON value to a float: numbers as-is, numeric strings parsed.
fn coerce_rate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
