//! External rate sources
//!
//! The normalization core never calls the network itself; it is handed a
//! [`RawPayload`]. This module provides the fetch side:
//! - exchangerate.host: the `/timeframe` HTTP endpoint
//! - cache: a TTL cache that wraps any source

pub mod cache;
pub mod exchangerate_host;

pub use cache::{CachedSource, ResponseCache};
pub use exchangerate_host::ExchangeRateHostSource;

use crate::data::fx::{FxQuery, RawPayload};
use crate::error::Result;
use std::future::Future;

/// A provider of raw timeframe payloads
pub trait RateSource: Send + Sync {
    /// Fetch the payload for a query's requested currencies and date range.
    fn fetch_timeframe(
        &self,
        query: &FxQuery,
    ) -> impl Future<Output = Result<RawPayload>> + Send;

    /// Endpoint identifier recorded in the export metadata
    fn endpoint(&self) -> &str;
}
