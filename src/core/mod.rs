//! Core business logic abstractions

pub mod calculator;
pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod favorites;
pub mod history;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use converter::{ConversionRecord, Converter};
pub use currency::{Currency, CurrencyRateProvider, CurrencyRegistry};
pub use error::{Result, XchangeError};
pub use favorites::{FavoritePair, Favorites};
pub use history::HistoryStore;
pub use rates::RateTable;
