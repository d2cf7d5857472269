//! Static exchange-rate table keyed by ordered currency pairs.

use crate::core::currency::{CurrencyRateProvider, CurrencyRegistry};
use crate::core::error::{Result, XchangeError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateEntry {
    pub rate: Decimal,
    /// Set when the entry is the reciprocal of an explicit rate.
    pub derived: bool,
}

/// Flat `(base, target) -> rate` table where `1 base = rate target`.
#[derive(Debug, Clone)]
pub struct RateTable {
    known: HashSet<String>,
    entries: BTreeMap<(String, String), RateEntry>,
}

impl RateTable {
    /// Builds the table from explicit `base -> {target: rate}` rows.
    ///
    /// Every explicit `A -> B` without an `B -> A` counterpart gets a derived
    /// `1 / rate` entry. Only direct reciprocals are derived: a pair reachable
    /// only through a third currency stays absent.
    pub fn new(
        registry: &CurrencyRegistry,
        explicit: &BTreeMap<String, BTreeMap<String, Decimal>>,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (base, targets) in explicit {
            for (target, rate) in targets {
                for code in [base, target] {
                    if !registry.contains(code) {
                        return Err(XchangeError::UnknownCurrency(code.clone()));
                    }
                }
                if *rate <= Decimal::ZERO {
                    return Err(XchangeError::InvalidRate {
                        from: base.clone(),
                        to: target.clone(),
                        rate: *rate,
                    });
                }
                entries.insert(
                    (base.clone(), target.clone()),
                    RateEntry {
                        rate: *rate,
                        derived: false,
                    },
                );
            }
        }

        let explicit_pairs: Vec<((String, String), Decimal)> = entries
            .iter()
            .map(|(pair, entry)| (pair.clone(), entry.rate))
            .collect();
        for ((base, target), rate) in explicit_pairs {
            let reverse = (target, base);
            if !entries.contains_key(&reverse) {
                debug!("Deriving {} -> {} from reciprocal", reverse.0, reverse.1);
                entries.insert(
                    reverse,
                    RateEntry {
                        rate: Decimal::ONE / rate,
                        derived: true,
                    },
                );
            }
        }

        Ok(RateTable {
            known: registry.iter().map(|c| c.code.clone()).collect(),
            entries,
        })
    }

    pub fn rate(&self, from: &str, to: &str) -> Result<Decimal> {
        if !self.known.contains(from) || !self.known.contains(to) {
            return Err(unknown_pair(from, to));
        }
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.entries
            .get(&(from.to_string(), to.to_string()))
            .map(|entry| entry.rate)
            .ok_or_else(|| unknown_pair(from, to))
    }

    /// All rates quoted from `base`, sorted by target code.
    pub fn rates_from(&self, base: &str) -> Result<Vec<(String, RateEntry)>> {
        if !self.known.contains(base) {
            return Err(XchangeError::UnknownCurrency(base.to_string()));
        }
        let rates: Vec<(String, RateEntry)> = self
            .entries
            .iter()
            .filter(|((b, _), _)| b == base)
            .map(|((_, target), entry)| (target.clone(), *entry))
            .collect();
        if rates.is_empty() {
            return Err(XchangeError::UnknownPair {
                from: base.to_string(),
                to: "*".to_string(),
            });
        }
        Ok(rates)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unknown_pair(from: &str, to: &str) -> XchangeError {
    XchangeError::UnknownPair {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[async_trait]
impl CurrencyRateProvider for RateTable {
    async fn get_rate(&self, from: &str, to: &str, _amount: Decimal) -> Result<Decimal> {
        self.rate(from, to)
    }
}
