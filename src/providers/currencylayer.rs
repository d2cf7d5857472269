use async_trait::async_trait;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyRateProvider;
use crate::core::error::{Result, XchangeError};

// CurrencyLayerProvider implementation for CurrencyRateProvider
pub struct CurrencyLayerProvider {
    base_url: String,
    access_key: String,
}

impl CurrencyLayerProvider {
    pub fn new(base_url: &str, access_key: &str) -> Self {
        CurrencyLayerProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    success: bool,
    result: Option<f64>,
    info: Option<ConvertInfo>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ConvertInfo {
    quote: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i64>,
    info: Option<String>,
}

fn service_error(message: String) -> XchangeError {
    XchangeError::RateService(message)
}

fn to_decimal(value: f64, pair: &str) -> Result<Decimal> {
    Decimal::try_from(value)
        .map_err(|e| service_error(format!("Invalid number {value} for {pair}: {e}")))
}

#[async_trait]
impl CurrencyRateProvider for CurrencyLayerProvider {
    #[instrument(name = "CurrencyLayerRateFetch", skip(self), fields(from = %from, to = %to))]
    async fn get_rate(&self, from: &str, to: &str, amount: Decimal) -> Result<Decimal> {
        let pair = format!("{from}{to}");
        let amount_param = amount.to_string();
        let url = Url::parse_with_params(
            &format!("{}/convert", self.base_url),
            &[
                ("access_key", self.access_key.as_str()),
                ("from", from),
                ("to", to),
                ("amount", amount_param.as_str()),
            ],
        )
        .map_err(|e| service_error(format!("Invalid service URL {}: {}", self.base_url, e)))?;
        debug!("Requesting conversion from {}/convert", self.base_url);

        let client = reqwest::Client::builder()
            .user_agent("xchange/0.1")
            .build()
            .map_err(|e| service_error(format!("Failed to build HTTP client: {e}")))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| service_error(format!("Request error: {e} for currency pair: {pair}")))?;

        if !response.status().is_success() {
            return Err(service_error(format!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                pair
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| service_error(format!("Failed to read response for {pair}: {e}")))?;

        let data: ConvertResponse = serde_json::from_str(&text).map_err(|e| {
            service_error(format!("Failed to parse JSON response for {pair}: {e}"))
        })?;
        debug!(response = ?data, "Received conversion response");

        if !data.success {
            let reason = data
                .error
                .map(|e| match (e.code, e.info) {
                    (Some(code), Some(info)) => format!("{info} (code {code})"),
                    (None, Some(info)) => info,
                    (Some(code), None) => format!("code {code}"),
                    (None, None) => "no details".to_string(),
                })
                .unwrap_or_else(|| "no details".to_string());
            return Err(service_error(format!(
                "Service reported failure for currency pair {pair}: {reason}"
            )));
        }

        let rate = match (data.info.and_then(|i| i.quote), data.result) {
            (Some(quote), _) => to_decimal(quote, &pair)?,
            (None, Some(result)) => {
                let converted = to_decimal(result, &pair)?;
                converted
                    .checked_div(amount)
                    .ok_or_else(|| service_error(format!("Cannot derive rate for {pair}")))?
            }
            (None, None) => {
                return Err(service_error(format!(
                    "No rate data found for currency pair: {pair}"
                )));
            }
        };

        if rate <= Decimal::ZERO {
            return Err(service_error(format!(
                "Non-positive rate {rate} for currency pair: {pair}"
            )));
        }
        Ok(rate)
    }
}
