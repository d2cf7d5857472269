use crate::core::currency::Currency;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CURRENCYLAYER_URL: &str = "https://api.currencylayer.com";

/// How a session stores history and sources rates.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// History is persisted to disk; a configured remote provider is used for rates.
    #[default]
    Persistent,
    /// Static rates only, history kept in memory. No external calls.
    InMemory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyLayerConfig {
    #[serde(default = "default_currencylayer_url")]
    pub base_url: String,
    pub access_key: String,
}

fn default_currencylayer_url() -> String {
    DEFAULT_CURRENCYLAYER_URL.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    pub currencylayer: Option<CurrencyLayerConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub history_path: Option<String>,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<Currency>,
    #[serde(default = "default_rates")]
    pub rates: BTreeMap<String, BTreeMap<String, Decimal>>,
    #[serde(default)]
    pub favorites: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            mode: Mode::default(),
            providers: ProvidersConfig::default(),
            history_path: None,
            currencies: default_currencies(),
            rates: default_rates(),
            favorites: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Location of the history file, or `None` when history stays in memory.
    pub fn history_path(&self) -> Result<Option<PathBuf>> {
        if self.mode == Mode::InMemory {
            return Ok(None);
        }
        if let Some(custom_path) = &self.history_path {
            return Ok(Some(PathBuf::from(custom_path)));
        }
        let proj_dirs = project_dirs()?;
        Ok(Some(proj_dirs.data_dir().join("history.jsonl")))
    }

    /// Remote provider settings, only honored outside in-memory mode.
    pub fn remote_provider(&self) -> Option<&CurrencyLayerConfig> {
        match self.mode {
            Mode::Persistent => self.providers.currencylayer.as_ref(),
            Mode::InMemory => None,
        }
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "xchange", "xchange").context("Could not determine project directories")
}

pub fn default_currencies() -> Vec<Currency> {
    [
        ("USD", "US Dollar", "$"),
        ("EUR", "Euro", "€"),
        ("GBP", "British Pound", "£"),
        ("JPY", "Japanese Yen", "¥"),
        ("CAD", "Canadian Dollar", "C$"),
        ("AUD", "Australian Dollar", "A$"),
        ("CHF", "Swiss Franc", "CHF"),
        ("CNY", "Chinese Yuan", "¥"),
        ("INR", "Indian Rupee", "₹"),
        ("KRW", "South Korean Won", "₩"),
        ("VND", "Vietnamese Dong", "₫"),
        ("SGD", "Singapore Dollar", "S$"),
        ("THB", "Thai Baht", "฿"),
        ("MYR", "Malaysian Ringgit", "RM"),
    ]
    .into_iter()
    .map(|(code, name, symbol)| Currency::new(code, name, symbol))
    .collect()
}

/// Explicit rate rows as `(target, mantissa, scale)`. Rows for other bases are derived.
const EXPLICIT_RATES: &[(&str, &[(&str, i64, u32)])] = &[
    (
        "USD",
        &[
            ("EUR", 85, 2),
            ("GBP", 73, 2),
            ("JPY", 110, 0),
            ("CAD", 125, 2),
            ("AUD", 135, 2),
            ("CHF", 92, 2),
            ("CNY", 645, 2),
            ("INR", 745, 1),
            ("KRW", 1180, 0),
            ("VND", 23500, 0),
            ("SGD", 135, 2),
            ("THB", 335, 1),
            ("MYR", 42, 1),
        ],
    ),
    (
        "EUR",
        &[
            ("USD", 118, 2),
            ("GBP", 86, 2),
            ("JPY", 1295, 1),
            ("CAD", 147, 2),
            ("AUD", 159, 2),
            ("CHF", 108, 2),
            ("CNY", 76, 1),
            ("INR", 878, 1),
            ("KRW", 1391, 0),
            ("VND", 27650, 0),
            ("SGD", 159, 2),
            ("THB", 394, 1),
            ("MYR", 495, 2),
        ],
    ),
    (
        "GBP",
        &[
            ("USD", 137, 2),
            ("EUR", 116, 2),
            ("JPY", 1507, 1),
            ("CAD", 171, 2),
            ("AUD", 185, 2),
            ("CHF", 126, 2),
            ("CNY", 884, 2),
            ("INR", 1021, 1),
            ("KRW", 1616, 0),
            ("VND", 32150, 0),
            ("SGD", 185, 2),
            ("THB", 458, 1),
            ("MYR", 575, 2),
        ],
    ),
    (
        "VND",
        &[
            ("USD", 426, 7),
            ("EUR", 362, 7),
            ("GBP", 311, 7),
            ("JPY", 47, 4),
            ("CAD", 532, 7),
            ("AUD", 575, 7),
            ("CHF", 390, 7),
            ("CNY", 275, 6),
            ("INR", 317, 5),
            ("KRW", 50, 3),
            ("SGD", 575, 7),
            ("THB", 143, 5),
            ("MYR", 18, 5),
        ],
    ),
];

pub fn default_rates() -> BTreeMap<String, BTreeMap<String, Decimal>> {
    EXPLICIT_RATES
        .iter()
        .map(|(base, row)| {
            let targets = row
                .iter()
                .map(|(target, mantissa, scale)| {
                    (target.to_string(), Decimal::new(*mantissa, *scale))
                })
                .collect();
            (base.to_string(), targets)
        })
        .collect()
}
