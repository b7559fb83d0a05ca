//! Provider payload decoding
//!
//! The timeframe endpoint answers in one of two shapes:
//!
//! ```text
//! {"quotes": {"2024-01-01": {"USDEUR": 0.90, "USDGBP": 0.78}}}
//! {"rates":  {"2024-01-01": {"EUR": 0.90, "GBP": 0.78}}}
//! ```
//!
//! The shape is decided once here and carried downward as [`RawPayload`].

use crate::error::{FxError, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// How a day's record keys its values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireSchema {
    /// Bare target codes, implicitly versus the pivot (`{"EUR": 0.9}`)
    BareCode,
    /// Concatenated pivot+target pair codes (`{"USDEUR": 0.9}`)
    PairCode,
}

/// One date block as it appeared on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct RawDay {
    pub date: String,
    pub record: Value,
}

/// Decoded provider payload, tagged by wire shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Rates(Vec<RawDay>),
    Quotes(Vec<RawDay>),
}

impl RawPayload {
    /// Decode raw response bytes.
    ///
    /// Duplicate date keys are kept in wire order so the assembler can
    /// report them.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| FxError::SchemaError(format!("undecodable payload: {}", e)))?;
        envelope.into_payload()
    }

    /// Decode a payload that is already a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(FxError::SchemaError(
                "payload is not a JSON object".to_string(),
            ));
        }
        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| FxError::SchemaError(format!("undecodable payload: {}", e)))?;
        envelope.into_payload()
    }

    pub fn schema(&self) -> WireSchema {
        match self {
            RawPayload::Rates(_) => WireSchema::BareCode,
            RawPayload::Quotes(_) => WireSchema::PairCode,
        }
    }

    pub fn days(&self) -> &[RawDay] {
        match self {
            RawPayload::Rates(days) | RawPayload::Quotes(days) => days,
        }
    }

    pub fn len(&self) -> usize {
        self.days().len()
    }

    pub fn is_empty(&self) -> bool {
        self.days().is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    /// Only read when `success` is false
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    quotes: Option<DayEntries>,
    #[serde(default)]
    rates: Option<DayEntries>,
}

impl Envelope {
    fn into_payload(self) -> Result<RawPayload> {
        if self.success == Some(false) {
            if let Some(error) = self.error.filter(|e| !e.is_null()) {
                return Err(FxError::ProviderError(provider_message(&error)));
            }
        }

        match (self.quotes, self.rates) {
            (Some(quotes), _) => Ok(RawPayload::Quotes(quotes.0)),
            (None, Some(rates)) => Ok(RawPayload::Rates(rates.0)),
            (None, None) => Err(FxError::SchemaError(
                "missing 'rates'/'quotes'".to_string(),
            )),
        }
    }
}

/// `info`, then `type`, from an error object; a bare string is used as-is.
fn provider_message(error: &Value) -> String {
    let text = match error {
        Value::Object(fields) => fields
            .get("info")
            .and_then(Value::as_str)
            .or_else(|| fields.get("type").and_then(Value::as_str)),
        Value::String(text) => Some(text.as_str()),
        _ => None,
    };
    text.unwrap_or("unknown error").to_string()
}

/// Date blocks in wire order, duplicates preserved
#[derive(Debug)]
struct DayEntries(Vec<RawDay>);

impl<'de> Deserialize<'de> for DayEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DayEntriesVisitor;

        impl<'de> Visitor<'de> for DayEntriesVisitor {
            type Value = DayEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from date to day record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<DayEntries, A::Error> {
                let mut days = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((date, record)) = map.next_entry::<String, Value>()? {
                    days.push(RawDay { date, record });
                }
                Ok(DayEntries(days))
            }
        }

        deserializer.deserialize_map(DayEntriesVisitor)
    }
}
