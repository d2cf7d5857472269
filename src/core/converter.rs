//! Turns an amount and a currency pair into a conversion record.

use crate::core::currency::{CurrencyRateProvider, CurrencyRegistry};
use crate::core::error::{Result, XchangeError};
use crate::core::history::HistoryStore;
use chrono::{Local, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Formats `value` with exactly `dp` decimal places, rounding half away from zero.
pub fn format_dp(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub timestamp: NaiveDateTime,
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    /// `amount * rate`, unrounded.
    pub result: Decimal,
}

impl ConversionRecord {
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

impl Display for ConversionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} → {} {} (Rate: {})",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.amount,
            self.from,
            format_dp(self.result, 2),
            self.to,
            format_dp(self.rate, 4)
        )
    }
}

pub struct Converter {
    registry: Arc<CurrencyRegistry>,
    provider: Arc<dyn CurrencyRateProvider>,
}

impl Converter {
    pub fn new(registry: Arc<CurrencyRegistry>, provider: Arc<dyn CurrencyRateProvider>) -> Self {
        Converter { registry, provider }
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    /// Computes a conversion without recording it anywhere.
    pub async fn quote(&self, amount: Decimal, from: &str, to: &str) -> Result<ConversionRecord> {
        if amount <= Decimal::ZERO {
            return Err(XchangeError::InvalidAmount(amount));
        }
        for code in [from, to] {
            if !self.registry.contains(code) {
                return Err(XchangeError::UnknownCurrency(code.to_string()));
            }
        }

        let rate = if from == to {
            Decimal::ONE
        } else {
            self.provider.get_rate(from, to, amount).await?
        };
        let result = amount
            .checked_mul(rate)
            .ok_or(XchangeError::InvalidAmount(amount))?;
        debug!(%amount, from, to, %rate, %result, "Converted");

        Ok(ConversionRecord {
            timestamp: Local::now().naive_local(),
            amount,
            from: from.to_string(),
            to: to.to_string(),
            rate,
            result,
        })
    }

    /// Converts and records the result in `history`. Identity conversions are not recorded.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        history: &mut HistoryStore,
    ) -> Result<ConversionRecord> {
        let record = self.quote(amount, from, to).await?;
        if !record.is_identity() {
            history.record(record.clone());
        }
        Ok(record)
    }
}
