//! Property tests for quote parsing, base conversion and assembly

use fx_timeframe::currency::CurrencyCode;
use fx_timeframe::data::fx::{assemble, parse_day, to_base, RawPayload, WireSchema};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

const POOL: [&str; 8] = ["EUR", "GBP", "JPY", "CHF", "AUD", "CAD", "SEK", "NOK"];

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::parse(s).unwrap()
}

/// A day's pivot-relative values over a subset of the pool
fn day_values() -> impl Strategy<Value = BTreeMap<String, f64>> {
    prop::collection::btree_map(
        prop::sample::select(POOL.to_vec()).prop_map(str::to_string),
        1e-4f64..1e4,
        1..POOL.len(),
    )
}

fn bare_record(values: &BTreeMap<String, f64>) -> Value {
    let map: Map<String, Value> = values.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
    Value::Object(map)
}

fn pair_record(values: &BTreeMap<String, f64>) -> Value {
    let map: Map<String, Value> = values
        .iter()
        .map(|(k, v)| (format!("USD{}", k), json!(v)))
        .collect();
    Value::Object(map)
}

proptest! {
    #[test]
    fn prop_schema_independence(values in day_values(), base in prop::sample::select(POOL.to_vec())) {
        let bare = parse_day(&bare_record(&values), WireSchema::BareCode).quote;
        let pair = parse_day(&pair_record(&values), WireSchema::PairCode).quote;
        prop_assert_eq!(to_base(&bare, code(base)), to_base(&pair, code(base)));
    }

    #[test]
    fn prop_base_is_exactly_one_and_usd_round_trips(values in day_values()) {
        let quote = parse_day(&bare_record(&values), WireSchema::BareCode).quote;
        for (key, pivot_value) in &values {
            let base = code(key);
            let row = to_base(&quote, base).unwrap();
            prop_assert_eq!(row.get(base), Some(1.0));
            let usd = row.get(CurrencyCode::USD).unwrap();
            prop_assert!((usd * pivot_value - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_series_ordering_and_idempotence(
        days in prop::collection::btree_map(0u32..365, day_values(), 0..20),
        base in prop::sample::select(POOL.to_vec()),
    ) {
        let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let rates: Map<String, Value> = days
            .iter()
            .rev()
            .map(|(offset, values)| {
                let date = start + chrono::Duration::days(i64::from(*offset));
                (date.format("%Y-%m-%d").to_string(), bare_record(values))
            })
            .collect();
        let payload = RawPayload::from_value(json!({ "rates": rates })).unwrap();

        let first = assemble(&payload, code(base));
        let second = assemble(&payload, code(base));
        prop_assert_eq!(&first, &second);

        let series = first.series;
        prop_assert_eq!(series.columns()[0], code(base));
        prop_assert!(series.dates().windows(2).all(|w| w[0] < w[1]));

        let with_base = days.values().filter(|v| v.contains_key(base)).count();
        prop_assert_eq!(series.len(), with_base);
        prop_assert_eq!(series.is_empty(), with_base == 0);
    }
}
