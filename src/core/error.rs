//! Error types for the conversion core

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XchangeError {
    #[error("Invalid amount: {0} (must be greater than zero)")]
    InvalidAmount(Decimal),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("No exchange rate for {from} → {to}")]
    UnknownPair { from: String, to: String },

    #[error("Invalid rate {rate} for {from} → {to}")]
    InvalidRate {
        from: String,
        to: String,
        rate: Decimal,
    },

    #[error("Rate service error: {0}")]
    RateService(String),

    #[error("History I/O error: {0}")]
    HistoryIo(#[from] std::io::Error),

    #[error("Corrupt history data at line {line}: {reason}")]
    HistoryCorrupt { line: usize, reason: String },

    #[error("Selection {index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, XchangeError>;
