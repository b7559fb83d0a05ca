//! Market data handling
//!
//! - fx: normalization of provider payloads into base-currency series
//! - sources: fetching payloads over HTTP (feature `async`)

pub mod fx;

#[cfg(feature = "async")]
pub mod sources;
