pub mod cli;
pub mod core;
pub mod providers;

use crate::core::calculator::Operation;
use crate::core::config::AppConfig;
use crate::core::{
    ConversionRecord, Converter, CurrencyRateProvider, CurrencyRegistry, FavoritePair, Favorites,
    HistoryStore, RateTable,
};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Interactive,
    Convert {
        amount: Decimal,
        from: String,
        to: String,
    },
    Currencies,
    Rates {
        base: String,
    },
    History,
    ClearHistory,
    Calc {
        lhs: Decimal,
        op: Operation,
        rhs: Decimal,
    },
}

/// A converter session: immutable registry and rates plus the mutable history and favorites.
pub struct App {
    converter: Converter,
    rates: Arc<RateTable>,
    remote: bool,
    pub history: HistoryStore,
    pub favorites: Favorites,
    notices: Vec<String>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let registry = Arc::new(CurrencyRegistry::new(config.currencies.clone()));
        let rates = Arc::new(
            RateTable::new(&registry, &config.rates)
                .context("Invalid exchange rate table in configuration")?,
        );
        debug!(
            "Built rate table with {} entries for {} currencies",
            rates.len(),
            registry.len()
        );

        let provider: Arc<dyn CurrencyRateProvider> = match config.remote_provider() {
            Some(remote) => {
                info!("Using remote rates from {}", remote.base_url);
                Arc::new(providers::CurrencyLayerProvider::new(
                    &remote.base_url,
                    &remote.access_key,
                ))
            }
            None => rates.clone(),
        };
        let remote = config.remote_provider().is_some();

        let mut notices = Vec::new();
        let history = match config.history_path()? {
            None => HistoryStore::in_memory(),
            Some(path) => match HistoryStore::load(&path) {
                Ok(history) => history,
                Err(e) => {
                    warn!(error = %e, "Failed to load history from {}", path.display());
                    notices.push(format!(
                        "Could not load history from {}: {}. Starting with empty history.",
                        path.display(),
                        e
                    ));
                    HistoryStore::empty_at(path)
                }
            },
        };

        let mut favorites = Favorites::new();
        for seed in &config.favorites {
            let added = seed
                .parse::<FavoritePair>()
                .and_then(|pair| Ok(favorites.add(&registry, &pair.from, &pair.to)?));
            if let Err(e) = added {
                warn!(error = %e, "Skipping configured favorite '{}'", seed);
            }
        }

        Ok(App {
            converter: Converter::new(registry, provider),
            rates,
            remote,
            history,
            favorites,
            notices,
        })
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        self.converter.registry()
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Whether rates come from the remote service instead of the static table.
    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Converts, records and persists the conversion.
    pub async fn convert(
        &mut self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> crate::core::Result<ConversionRecord> {
        let record = self
            .converter
            .convert(amount, from, to, &mut self.history)
            .await?;
        if !record.is_identity() {
            self.persist_history();
        }
        Ok(record)
    }

    /// Quotes the favorite at 1-based `index` without recording it.
    pub async fn use_favorite(
        &self,
        index: usize,
        amount: Decimal,
    ) -> crate::core::Result<ConversionRecord> {
        let pair = self.favorites.get(index)?;
        self.converter.quote(amount, &pair.from, &pair.to).await
    }

    pub fn add_favorite(&mut self, from: &str, to: &str) -> crate::core::Result<bool> {
        self.favorites.add(self.converter.registry(), from, to)
    }

    pub fn clear_history(&mut self) -> crate::core::Result<()> {
        self.history.clear()
    }

    /// Messages about degraded behavior that the user should see.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn persist_history(&mut self) {
        match self.history.save() {
            Ok(written) => debug!("Persisted {} new history records", written),
            Err(e) => {
                warn!(error = %e, "Failed to save history");
                self.notices.push(format!(
                    "Could not save history: {e}. History will not persist between sessions."
                ));
            }
        }
    }
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    let mut app = App::new(&config)?;
    if !matches!(command, AppCommand::Interactive) {
        cli::ui::print_notices(&app.take_notices());
    }

    match command {
        AppCommand::Interactive => {
            let stdin = std::io::stdin();
            let mut shell = cli::shell::Shell::new(app, stdin.lock(), std::io::stdout());
            shell.run().await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&mut app, amount, &from, &to).await
        }
        AppCommand::Currencies => {
            println!("{}", cli::currencies::render_currencies(app.registry()));
            Ok(())
        }
        AppCommand::Rates { base } => {
            println!(
                "{}",
                cli::rates::render_rates(app.registry(), app.rates(), &base)?
            );
            Ok(())
        }
        AppCommand::History => {
            println!("{}", cli::history::render_history(&app.history));
            Ok(())
        }
        AppCommand::ClearHistory => {
            app.clear_history()?;
            println!("History cleared.");
            Ok(())
        }
        AppCommand::Calc { lhs, op, rhs } => {
            let result = crate::core::calculator::calculate(lhs, op, rhs)?;
            println!(
                "{}",
                cli::calculator::render_calculation(lhs, op, rhs, result)
            );
            Ok(())
        }
    }
}
