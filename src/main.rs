use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use xchange::core::calculator::Operation;
use xchange::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xchange::AppCommand {
    fn from(cmd: Commands) -> xchange::AppCommand {
        match cmd {
            Commands::Interactive => xchange::AppCommand::Interactive,
            Commands::Convert { amount, from, to } => xchange::AppCommand::Convert {
                amount,
                from: from.to_uppercase(),
                to: to.to_uppercase(),
            },
            Commands::Currencies => xchange::AppCommand::Currencies,
            Commands::Rates { base } => xchange::AppCommand::Rates {
                base: base.to_uppercase(),
            },
            Commands::History => xchange::AppCommand::History,
            Commands::ClearHistory => xchange::AppCommand::ClearHistory,
            Commands::Calc { lhs, op, rhs } => xchange::AppCommand::Calc { lhs, op, rhs },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Start the interactive menu (default)
    Interactive,
    /// Convert an amount between two currencies
    Convert {
        #[arg(allow_hyphen_values = true)]
        amount: Decimal,
        from: String,
        to: String,
    },
    /// List supported currencies
    Currencies,
    /// Show every exchange rate from a base currency
    Rates { base: String },
    /// Show conversion history and statistics
    History,
    /// Delete all conversion history
    ClearHistory,
    /// Evaluate a single arithmetic operation
    Calc {
        #[arg(allow_hyphen_values = true)]
        lhs: Decimal,
        #[arg(value_parser = parse_operation)]
        op: Operation,
        #[arg(allow_hyphen_values = true)]
        rhs: Decimal,
    },
}

fn parse_operation(s: &str) -> Result<Operation, String> {
    s.parse().map_err(|e: xchange::core::XchangeError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xchange::cli::setup::setup(),
        Some(cmd) => xchange::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            xchange::run_command(
                xchange::AppCommand::Interactive,
                cli.config_path.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amounts_reach_the_converter() {
        let cli = Cli::try_parse_from(["xchange", "convert", "-5", "usd", "eur"]).unwrap();
        let Some(cmd) = cli.command else {
            panic!("expected a subcommand");
        };
        match xchange::AppCommand::from(cmd) {
            xchange::AppCommand::Convert { amount, from, to } => {
                assert_eq!(amount, Decimal::from(-5));
                assert_eq!(from, "USD");
                assert_eq!(to, "EUR");
            }
            _ => panic!("expected a convert command"),
        }
    }

    #[test]
    fn test_calc_accepts_negative_operands() {
        let cli = Cli::try_parse_from(["xchange", "calc", "-2", "*", "-3"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Calc { .. })));
    }
}
