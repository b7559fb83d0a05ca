//! Query metadata attached to an exported table

use crate::currency::CurrencyCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Immutable description of the query that produced a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMeta {
    base: CurrencyCode,
    targets: Vec<CurrencyCode>,
    start: NaiveDate,
    end: NaiveDate,
    endpoint: String,
    generated: DateTime<Utc>,
}

impl QueryMeta {
    /// Stamp a new record with the current UTC time
    pub fn new(
        base: CurrencyCode,
        targets: Vec<CurrencyCode>,
        start: NaiveDate,
        end: NaiveDate,
        endpoint: &str,
    ) -> Self {
        Self::with_generated(base, targets, start, end, endpoint, Utc::now())
    }

    pub fn with_generated(
        base: CurrencyCode,
        targets: Vec<CurrencyCode>,
        start: NaiveDate,
        end: NaiveDate,
        endpoint: &str,
        generated: DateTime<Utc>,
    ) -> Self {
        Self {
            base,
            targets,
            start,
            end,
            endpoint: endpoint.to_string(),
            generated,
        }
    }

    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    pub fn targets(&self) -> &[CurrencyCode] {
        &self.targets
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn generated(&self) -> DateTime<Utc> {
        self.generated
    }

    /// Key/value pairs for the metadata sheet, all values stringified.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let symbols = self
            .targets
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            ("Base", self.base.to_string()),
            ("Symbols", symbols),
            ("Start", self.start.to_string()),
            ("End", self.end.to_string()),
            ("Endpoint", self.endpoint.clone()),
            (
                "Generated",
                self.generated.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
        ]
    }
}
