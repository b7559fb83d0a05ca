//! Series assembler - per-day base rows merged into one date-indexed table
//!
//! Days whose record does not quote the base currency are dropped, never
//! kept as rows of nulls. Dates are unique and ascending; the base column
//! comes first and the remaining columns follow in code order.

use super::convert::{to_base, BaseRow};
use super::payload::RawPayload;
use super::quote::parse_day;
use crate::currency::CurrencyCode;
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::Serialize;
use serde_json::Value;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, BTreeSet};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_FORMAT_LEN: usize = 10;

/// Date-indexed table of rates expressed in one base currency
#[derive(Debug, Clone, PartialEq)]
pub struct RateSeries {
    base: CurrencyCode,
    columns: Vec<CurrencyCode>,
    dates: Vec<NaiveDate>,
    /// Row-major cells, `cells[row][column]`; `None` where a currency was not quoted
    cells: Vec<Vec<Option<f64>>>,
}

/// Per-column summary used for the quick stats view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub currency: CurrencyCode,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl RateSeries {
    /// An explicitly empty series: no rows, only the base column.
    pub fn empty(base: CurrencyCode) -> Self {
        Self {
            base,
            columns: vec![base],
            dates: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Build from dated rows. Column order is derived from the rows.
    pub fn from_rows(base: CurrencyCode, rows: BTreeMap<NaiveDate, BaseRow>) -> Self {
        if rows.is_empty() {
            return Self::empty(base);
        }

        let others: BTreeSet<CurrencyCode> = rows
            .values()
            .flat_map(|row| row.codes())
            .filter(|code| *code != base)
            .collect();

        let mut columns = Vec::with_capacity(others.len() + 1);
        columns.push(base);
        columns.extend(others);

        let mut dates = Vec::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());
        for (date, row) in rows {
            dates.push(date);
            cells.push(columns.iter().map(|code| row.get(*code)).collect());
        }

        Self {
            base,
            columns,
            dates,
            cells,
        }
    }

    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    /// Currency columns, base first
    pub fn columns(&self) -> &[CurrencyCode] {
        &self.columns
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when no day produced a usable row ("no data for this query").
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate rows as (date, cells in column order).
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[Option<f64>])> + '_ {
        self.dates
            .iter()
            .copied()
            .zip(self.cells.iter().map(|row| row.as_slice()))
    }

    pub fn column_index(&self, code: CurrencyCode) -> Option<usize> {
        self.columns.iter().position(|c| *c == code)
    }

    /// Cell lookup; `None` for unknown date/column or a missing value.
    pub fn value(&self, date: NaiveDate, code: CurrencyCode) -> Option<f64> {
        let col = self.column_index(code)?;
        let row = self.dates.binary_search(&date).ok()?;
        self.cells[row][col]
    }

    /// All cells of one column in date order.
    pub fn column(&self, code: CurrencyCode) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(code)?;
        Some(self.cells.iter().map(|row| row[col]).collect())
    }

    /// Keep the base plus the requested targets that actually appear.
    ///
    /// Targets keep their request order; duplicates and the base itself are
    /// ignored, unknown targets are dropped silently.
    pub fn project(&self, targets: &[CurrencyCode]) -> RateSeries {
        let mut columns = vec![self.base];
        for target in targets {
            if !columns.contains(target) && self.columns.contains(target) {
                columns.push(*target);
            }
        }

        let indices: Vec<usize> = columns
            .iter()
            .filter_map(|code| self.column_index(*code))
            .collect();

        let cells = self
            .cells
            .iter()
            .map(|row| indices.iter().map(|idx| row[*idx]).collect())
            .collect();

        RateSeries {
            base: self.base,
            columns,
            dates: self.dates.clone(),
            cells,
        }
    }

    /// Min / max / mean per column over the cells that hold a value.
    ///
    /// Columns without any value are omitted.
    pub fn describe(&self) -> Vec<ColumnStats> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(col, code)| {
                let values: Vec<f64> = self.cells.iter().filter_map(|row| row[col]).collect();
                if values.is_empty() {
                    return None;
                }
                Some(ColumnStats {
                    currency: *code,
                    count: values.len(),
                    min: Statistics::min(values.iter()),
                    max: Statistics::max(values.iter()),
                    mean: Statistics::mean(values.iter()),
                })
            })
            .collect()
    }

    /// Materialize as a polars DataFrame: a `date` column, then one
    /// nullable float column per currency.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut series = Vec::with_capacity(self.columns.len() + 1);
        series.push(Series::new("date", self.dates.clone()));
        for (col, code) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = self.cells.iter().map(|row| row[col]).collect();
            series.push(Series::new(code.as_str(), values));
        }
        Ok(DataFrame::new(series)?)
    }
}

/// Diagnostics for one assembly pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssemblyReport {
    /// Date blocks present in the payload, duplicates included
    pub days_seen: usize,
    /// Rows in the resulting series
    pub days_converted: usize,
    /// Days dropped because the base currency was not quoted
    pub days_missing_base: usize,
    /// Days dropped because the key was not a `YYYY-MM-DD` date
    pub days_invalid_date: usize,
    /// Individual entries dropped for a malformed key or value
    pub entries_skipped: usize,
    /// Dates that appeared more than once; the last block won
    pub duplicate_dates: Vec<NaiveDate>,
}

impl AssemblyReport {
    pub fn days_skipped(&self) -> usize {
        self.days_missing_base + self.days_invalid_date
    }

    pub fn has_warnings(&self) -> bool {
        self.days_skipped() > 0 || self.entries_skipped > 0 || !self.duplicate_dates.is_empty()
    }
}

/// Output of the assembler
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub series: RateSeries,
    pub report: AssemblyReport,
}

/// Assemble a decoded payload into a series in `base` terms.
pub fn assemble(payload: &RawPayload, base: CurrencyCode) -> Assembly {
    let schema = payload.schema();
    let mut report = AssemblyReport::default();
    let mut rows: BTreeMap<NaiveDate, BaseRow> = BTreeMap::new();
    // Last block for a date wins, even when it is the unusable one
    let mut seen: BTreeSet<NaiveDate> = BTreeSet::new();

    for day in payload.days() {
        report.days_seen += 1;

        let Some(date) = parse_date_key(&day.date) else {
            log::warn!("Skipping block with invalid date {:?}", day.date);
            report.days_invalid_date += 1;
            continue;
        };

        if !seen.insert(date) {
            log::warn!("Duplicate block for {}; keeping the last one", date);
            if !report.duplicate_dates.contains(&date) {
                report.duplicate_dates.push(date);
            }
        }

        let parsed = parse_day(&day.record, schema);
        report.entries_skipped += parsed.skipped;

        match to_base(&parsed.quote, base) {
            Some(row) => {
                report.entries_skipped += row.dropped();
                rows.insert(date, row);
            }
            None => {
                log::debug!("No {} quote on {}; dropping day", base, date);
                report.days_missing_base += 1;
                rows.remove(&date);
            }
        }
    }

    report.duplicate_dates.sort();
    report.days_converted = rows.len();

    if rows.is_empty() {
        log::warn!("No usable rows for base {}", base);
    } else {
        log::info!(
            "Assembled {} rows for base {} ({} days skipped)",
            rows.len(),
            base,
            report.days_skipped()
        );
    }

    Assembly {
        series: RateSeries::from_rows(base, rows),
        report,
    }
}

/// Strict `YYYY-MM-DD`; chrono alone would also take `2024-1-1`.
fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    if key.len() != DATE_FORMAT_LEN {
        return None;
    }
    NaiveDate::parse_from_str(key, DATE_FORMAT).ok()
}

/// Assemble straight from a decoded JSON value.
///
/// Fails with a schema error when neither `rates` nor `quotes` is present.
pub fn assemble_json(value: Value, base: CurrencyCode) -> Result<Assembly> {
    let payload = RawPayload::from_value(value)?;
    Ok(assemble(&payload, base))
}
