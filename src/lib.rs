//! # fx-timeframe
//!
//! Historical FX time series from the exchangerate.host `/timeframe`
//! endpoint, normalized into one table expressed in a base currency of your
//! choice and exported as an Excel workbook.
//!
//! The provider quotes everything against USD, in one of two shapes
//! (`rates` with bare codes, `quotes` with pair codes). Each day is parsed,
//! converted to the chosen base, and merged into a [`RateSeries`]; days that
//! do not quote the base are dropped.
//!
//! ## Example
//!
//! ```rust
//! use fx_timeframe::prelude::*;
//! use serde_json::json;
//!
//! let gbp = CurrencyCode::parse("GBP").unwrap();
//! let payload = json!({"rates": {"2024-01-01": {"EUR": 0.90, "GBP": 0.78, "USD": 1.0}}});
//!
//! let assembly = assemble_json(payload, gbp).unwrap();
//! let series = assembly.series;
//!
//! let names: Vec<&str> = series.columns().iter().map(|c| c.as_str()).collect();
//! assert_eq!(names, ["GBP", "EUR", "USD"]);
//! ```
//!
//! [`RateSeries`]: data::fx::RateSeries

pub mod calendar;
#[cfg(feature = "cli")]
pub mod config;
pub mod currency;
pub mod data;
pub mod error;
pub mod export;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::calendar::Period;
    pub use crate::currency::CurrencyCode;
    pub use crate::data::fx::{
        assemble, assemble_json, Assembly, AssemblyReport, FxQuery, QueryMeta, RateSeries,
        RawPayload,
    };
    #[cfg(feature = "async")]
    pub use crate::data::sources::{CachedSource, ExchangeRateHostSource, RateSource, ResponseCache};
    pub use crate::error::{FxError, Result};
    pub use crate::export::{to_xlsx_bytes, write_csv};
}
