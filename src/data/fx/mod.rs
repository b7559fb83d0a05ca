//! Foreign Exchange (FX) time series normalization
//!
//! Turns a provider timeframe payload into a date-indexed table expressed in
//! a caller-chosen base currency.
//!
//! # Components
//!
//! - **payload**: wire-shape detection (`rates` vs `quotes`)
//! - **quote**: one day's record into pivot-relative values
//! - **convert**: pivot-relative values into base terms
//! - **series**: days merged into a [`RateSeries`]
//! - **query** / **meta**: request parameters and the exported metadata record
//!
//! # Example
//!
//! ```rust
//! use fx_timeframe::currency::CurrencyCode;
//! use fx_timeframe::data::fx::assemble_json;
//! use serde_json::json;
//!
//! let payload = json!({"quotes": {"2024-01-01": {"USDEUR": 0.90, "USDGBP": 0.78}}});
//! let gbp = CurrencyCode::parse("GBP").unwrap();
//! let assembly = assemble_json(payload, gbp).unwrap();
//!
//! assert_eq!(assembly.series.len(), 1);
//! assert_eq!(assembly.series.columns()[0], gbp);
//! ```

pub mod convert;
pub mod meta;
pub mod payload;
pub mod query;
pub mod quote;
pub mod series;

pub use convert::{to_base, BaseRow};
pub use meta::QueryMeta;
pub use payload::{RawDay, RawPayload, WireSchema};
pub use query::FxQuery;
pub use quote::{parse_day, DayQuote, ParsedDay};
pub use series::{assemble, assemble_json, Assembly, AssemblyReport, ColumnStats, RateSeries};
