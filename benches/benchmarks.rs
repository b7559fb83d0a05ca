use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fx_timeframe::currency::{CurrencyCode, COMMON_CURRENCIES};
use fx_timeframe::data::fx::{assemble, QueryMeta, RawPayload};
use fx_timeframe::export::to_xlsx_bytes;
use serde_json::{json, Map, Value};

fn year_of_quotes() -> RawPayload {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut days = Map::new();
    for i in 0..365 {
        let date = start + Duration::days(i);
        let record: Map<String, Value> = COMMON_CURRENCIES
            .iter()
            .enumerate()
            .map(|(n, code)| {
                let value = 0.5 + n as f64 * 0.37 + (i as f64 * 0.01).sin() * 0.05;
                (format!("USD{}", code), json!(value))
            })
            .collect();
        days.insert(date.format("%Y-%m-%d").to_string(), Value::Object(record));
    }
    RawPayload::from_value(json!({ "quotes": days })).unwrap()
}

fn benchmark_assemble(c: &mut Criterion) {
    let payload = year_of_quotes();
    let base = CurrencyCode::parse("GBP").unwrap();

    c.bench_function("assemble_365_days_22_currencies", |b| {
        b.iter(|| assemble(black_box(&payload), black_box(base)));
    });
}

fn benchmark_export(c: &mut Criterion) {
    let payload = year_of_quotes();
    let base = CurrencyCode::parse("GBP").unwrap();
    let series = assemble(&payload, base).series;
    let meta = QueryMeta::new(
        base,
        CurrencyCode::common(),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        "/timeframe",
    );

    c.bench_function("xlsx_export_365_days", |b| {
        b.iter(|| to_xlsx_bytes(black_box(&series), black_box(&meta)).unwrap());
    });
}

criterion_group!(benches, benchmark_assemble, benchmark_export);
criterion_main!(benches);
