//! Session-scoped list of favorite currency pairs.

use crate::core::currency::CurrencyRegistry;
use crate::core::error::{Result, XchangeError};
use std::fmt::Display;
use std::str::FromStr;

const PAIR_SEPARATOR: &str = " → ";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FavoritePair {
    pub from: String,
    pub to: String,
}

impl FavoritePair {
    pub fn new(from: &str, to: &str) -> Self {
        FavoritePair {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl Display for FavoritePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.from, PAIR_SEPARATOR, self.to)
    }
}

impl FromStr for FavoritePair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (from, to) = s
            .split_once(PAIR_SEPARATOR)
            .ok_or_else(|| anyhow::anyhow!("Invalid currency pair: {}", s))?;
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            anyhow::bail!("Invalid currency pair: {}", s);
        }
        Ok(FavoritePair::new(from, to))
    }
}

/// Ordered, duplicate-free favorites. Positions are 1-based, as displayed.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    pairs: Vec<FavoritePair>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the pair. Returns `Ok(false)` when it is already a favorite.
    pub fn add(&mut self, registry: &CurrencyRegistry, from: &str, to: &str) -> Result<bool> {
        for code in [from, to] {
            if !registry.contains(code) {
                return Err(XchangeError::UnknownCurrency(code.to_string()));
            }
        }
        if self.contains(from, to) {
            return Ok(false);
        }
        self.pairs.push(FavoritePair::new(from, to));
        Ok(true)
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.pairs.iter().any(|p| p.from == from && p.to == to)
    }

    pub fn get(&self, index: usize) -> Result<&FavoritePair> {
        let pos = self.position(index)?;
        Ok(&self.pairs[pos])
    }

    pub fn remove(&mut self, index: usize) -> Result<FavoritePair> {
        let pos = self.position(index)?;
        Ok(self.pairs.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoritePair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn position(&self, index: usize) -> Result<usize> {
        if index == 0 || index > self.pairs.len() {
            return Err(XchangeError::OutOfRange {
                index,
                len: self.pairs.len(),
            });
        }
        Ok(index - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;

    fn registry() -> CurrencyRegistry {
        CurrencyRegistry::new(vec![
            Currency::new("USD", "US Dollar", "$"),
            Currency::new("EUR", "Euro", "€"),
            Currency::new("VND", "Vietnamese Dong", "₫"),
        ])
    }

    #[test]
    fn test_add_is_duplicate_free() {
        let registry = registry();
        let mut favorites = Favorites::new();

        assert!(favorites.add(&registry, "USD", "EUR").unwrap());
        assert!(!favorites.add(&registry, "USD", "EUR").unwrap());
        assert_eq!(favorites.len(), 1);

        // Direction matters
        assert!(favorites.add(&registry, "EUR", "USD").unwrap());
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn test_add_unknown_currency() {
        let mut favorites = Favorites::new();
        let result = favorites.add(&registry(), "USD", "XYZ");
        assert!(matches!(result, Err(XchangeError::UnknownCurrency(code)) if code == "XYZ"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_get_and_remove_are_one_based() {
        let registry = registry();
        let mut favorites = Favorites::new();
        favorites.add(&registry, "USD", "EUR").unwrap();
        favorites.add(&registry, "USD", "VND").unwrap();

        assert_eq!(favorites.get(2).unwrap(), &FavoritePair::new("USD", "VND"));
        let removed = favorites.remove(1).unwrap();
        assert_eq!(removed.to_string(), "USD → EUR");
        assert_eq!(favorites.get(1).unwrap().to, "VND");
    }

    #[test]
    fn test_out_of_range_does_not_mutate() {
        let registry = registry();
        let mut favorites = Favorites::new();
        favorites.add(&registry, "USD", "EUR").unwrap();

        for index in [0, 2, 10] {
            assert!(matches!(
                favorites.remove(index),
                Err(XchangeError::OutOfRange { len: 1, .. })
            ));
            assert!(favorites.get(index).is_err());
        }
        assert_eq!(favorites.len(), 1);
        assert!(matches!(
            Favorites::new().get(1),
            Err(XchangeError::OutOfRange { index: 1, len: 0 })
        ));
    }

    #[test]
    fn test_pair_parsing() {
        let pair: FavoritePair = "USD → VND".parse().unwrap();
        assert_eq!(pair, FavoritePair::new("USD", "VND"));
        assert_eq!(pair.to_string(), "USD → VND");
        assert!("USD-VND".parse::<FavoritePair>().is_err());
        assert!(" → VND".parse::<FavoritePair>().is_err());
    }
}
