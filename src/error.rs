//! Error types for fx-timeframe

use thiserror::Error;

/// Main error type for fx-timeframe
#[derive(Error, Debug)]
pub enum FxError {
    /// Top-level payload has neither `rates` nor `quotes`, or is not JSON at all
    #[error("Unexpected provider response: {0}")]
    SchemaError(String),

    /// Provider answered with its own error envelope
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Missing API key: {0}")]
    MissingCredentials(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Table error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),
}

impl From<rust_xlsxwriter::XlsxError> for FxError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        FxError::ExportError(err.to_string())
    }
}

impl FxError {
    /// True for failures that mean "could not retrieve data" to a user:
    /// transport failures, provider error envelopes and malformed payloads.
    pub fn is_retrieval_failure(&self) -> bool {
        matches!(
            self,
            FxError::SchemaError(_) | FxError::ProviderError(_) | FxError::HttpError(_)
        )
    }
}

/// Result type alias for fx-timeframe operations
pub type Result<T> = std::result::Result<T, FxError>;
