//! Currency registry and rate provider abstractions

use crate::core::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl Currency {
    pub fn new(code: &str, name: &str, symbol: &str) -> Self {
        Currency {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({})", self.code, self.name, self.symbol)
    }
}

/// Immutable set of known currencies, kept in definition order.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    currencies: Vec<Currency>,
    index: HashMap<String, usize>,
}

impl CurrencyRegistry {
    /// Builds the registry. A repeated code replaces the earlier definition in place.
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Self {
        let mut registry = CurrencyRegistry::default();
        for currency in currencies {
            match registry.index.get(&currency.code) {
                Some(&pos) => registry.currencies[pos] = currency,
                None => {
                    registry
                        .index
                        .insert(currency.code.clone(), registry.currencies.len());
                    registry.currencies.push(currency);
                }
            }
        }
        registry
    }

    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.index.get(code).map(|&pos| &self.currencies[pos])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

/// Source of exchange rates. `amount` is only meaningful for remote services
/// that quote per conversion.
#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str, amount: Decimal) -> Result<Decimal>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keeps_definition_order() {
        let registry = CurrencyRegistry::new(vec![
            Currency::new("USD", "US Dollar", "$"),
            Currency::new("EUR", "Euro", "€"),
            Currency::new("JPY", "Japanese Yen", "¥"),
        ]);

        let codes: Vec<&str> = registry.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["USD", "EUR", "JPY"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("EUR"));
        assert!(!registry.contains("eur"));
        assert!(registry.get("GBP").is_none());
    }

    #[test]
    fn test_registry_duplicate_code_replaces_in_place() {
        let registry = CurrencyRegistry::new(vec![
            Currency::new("USD", "Dollar", "$"),
            Currency::new("EUR", "Euro", "€"),
            Currency::new("USD", "US Dollar", "US$"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.iter().next().unwrap().name, "US Dollar");
        assert_eq!(registry.get("USD").unwrap().symbol, "US$");
    }

    #[test]
    fn test_currency_display() {
        let currency = Currency::new("INR", "Indian Rupee", "₹");
        assert_eq!(currency.to_string(), "INR - Indian Rupee (₹)");
    }
}
