//! Timeframe query parameters

use super::meta::QueryMeta;
use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user request: base currency, targets and an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FxQuery {
    pub base: CurrencyCode,
    pub targets: Vec<CurrencyCode>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FxQuery {
    /// Create a validated query
    pub fn new(
        base: CurrencyCode,
        targets: Vec<CurrencyCode>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self> {
        let query = Self {
            base,
            targets,
            start,
            end,
        };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(FxError::InvalidQuery(
                "choose at least one target currency".to_string(),
            ));
        }
        if self.start > self.end {
            return Err(FxError::InvalidQuery(format!(
                "start date {} must be on or before end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Currencies to ask the provider for: targets plus base, sorted and deduplicated.
    pub fn requested_currencies(&self) -> Vec<CurrencyCode> {
        let set: BTreeSet<CurrencyCode> = self
            .targets
            .iter()
            .copied()
            .chain(std::iter::once(self.base))
            .collect();
        set.into_iter().collect()
    }

    /// Metadata record for a fetch of this query against `endpoint`.
    pub fn meta(&self, endpoint: &str) -> QueryMeta {
        QueryMeta::new(
            self.base,
            self.targets.clone(),
            self.start,
            self.end,
            endpoint,
        )
    }

    /// Default export name, e.g. `fx_timeseries_GBP_2024-01-01_2024-01-31.xlsx`
    pub fn export_file_name(&self, extension: &str) -> String {
        format!(
            "fx_timeseries_{}_{}_{}.{}",
            self.base, self.start, self.end, extension
        )
    }
}
