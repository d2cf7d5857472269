//! Numbered-menu interactive session.

use super::{calculator, convert, currencies, favorites, history, rates, ui};
use crate::App;
use crate::core::calculator::{Operation, calculate};
use crate::core::error::XchangeError;
use anyhow::Result;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use tracing::debug;

const MENU: &[(&str, &str)] = &[
    ("1", "Convert currency"),
    ("2", "View currency list"),
    ("3", "Conversion history"),
    ("4", "Manage favorites"),
    ("5", "Quick calculator"),
    ("6", "Exchange rates table"),
    ("7", "Clear history"),
    ("0", "Exit"),
];

pub struct Shell<R, W> {
    app: App,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(app: App, input: R, output: W) -> Self {
        Shell { app, input, output }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Runs until the user exits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        self.say(&ui::heading("CURRENCY CONVERTER"))?;
        if let Some(path) = self.app.history.path() {
            let line = format!(
                "History file: {} ({} records loaded)",
                path.display(),
                self.app.history.len()
            );
            self.say(&ui::style_text(&line, ui::StyleType::Subtle))?;
        }
        self.flush_notices()?;

        loop {
            self.show_menu()?;
            let Some(choice) = self.prompt("Select function (0-7): ")? else {
                break;
            };
            debug!("Menu choice: {}", choice);

            let outcome = match choice.as_str() {
                "1" => self.convert().await,
                "2" => {
                    let list = currencies::render_currencies(self.app.registry());
                    self.say(&list)
                }
                "3" => {
                    let list = history::render_history(&self.app.history);
                    self.say(&list)
                }
                "4" => self.manage_favorites().await,
                "5" => self.calculator(),
                "6" => self.rate_table(),
                "7" => self.clear_history(),
                "0" => {
                    self.say("\nThank you for using Currency Converter!")?;
                    return Ok(());
                }
                _ => self.error("Invalid choice!"),
            };
            outcome?;
            self.flush_notices()?;
        }
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        let mut menu = format!("\n{}", ui::heading("MAIN MENU"));
        for (key, label) in MENU {
            menu.push_str(&format!("\n{key}. {label}"));
        }
        self.say(&menu)
    }

    async fn convert(&mut self) -> Result<()> {
        self.say(&format!("\n{}", ui::heading("CONVERT CURRENCY")))?;
        if !self.app.favorites.is_empty() {
            let list = favorites::render_favorites(&self.app.favorites);
            self.say(&list)?;
        }

        let Some(amount) = self.prompt_amount()? else {
            return Ok(());
        };
        let Some(from) = self.prompt_code("From currency (e.g., USD): ")? else {
            return Ok(());
        };
        let Some(to) = self.prompt_code("To currency (e.g., VND): ")? else {
            return Ok(());
        };

        let spinner = self
            .app
            .is_remote()
            .then(|| ui::new_spinner("Fetching exchange rate..."));
        let result = self.app.convert(amount, &from, &to).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let record = match result {
            Ok(record) => record,
            Err(e) => return self.report(&e),
        };
        let rendered = convert::render_conversion(&record, self.app.registry());
        self.say(&format!("\n{rendered}"))?;

        if record.is_identity() || self.app.favorites.contains(&from, &to) {
            return Ok(());
        }
        let answer = self.prompt("\nAdd this currency pair to favorites? (y/n): ")?;
        if answer.is_some_and(|a| a.eq_ignore_ascii_case("y")) {
            match self.app.add_favorite(&from, &to) {
                Ok(_) => self.success("Added to favorites list!")?,
                Err(e) => self.report(&e)?,
            }
        }
        Ok(())
    }

    async fn manage_favorites(&mut self) -> Result<()> {
        self.say(&format!("\n{}", ui::heading("MANAGE FAVORITES")))?;
        let list = favorites::render_favorites(&self.app.favorites);
        self.say(&list)?;

        if self.app.favorites.is_empty() {
            self.say("\n1. Add favorite currency pair\n0. Back")?;
            if self.prompt("\nChoose: ")?.as_deref() == Some("1") {
                self.add_favorite()?;
            }
            return Ok(());
        }

        self.say(
            "\n1. Use favorite currency pair\n2. Add new currency pair\n3. Remove favorite currency pair\n0. Back",
        )?;
        match self.prompt("\nChoose: ")?.as_deref() {
            Some("1") => self.use_favorite().await,
            Some("2") => self.add_favorite(),
            Some("3") => self.remove_favorite(),
            _ => Ok(()),
        }
    }

    fn add_favorite(&mut self) -> Result<()> {
        let Some(from) = self.prompt_code("\nEnter source currency (e.g., USD): ")? else {
            return Ok(());
        };
        let Some(to) = self.prompt_code("Enter target currency (e.g., VND): ")? else {
            return Ok(());
        };
        match self.app.add_favorite(&from, &to) {
            Ok(true) => self.success(&format!("Added '{from} → {to}' to favorites!")),
            Ok(false) => self.warning("This currency pair is already in the favorites list!"),
            Err(e) => self.report(&e),
        }
    }

    async fn use_favorite(&mut self) -> Result<()> {
        let Some(index) = self.prompt_index("\nSelect the number of the currency pair: ")? else {
            return Ok(());
        };
        if let Err(e) = self.app.favorites.get(index).map(|_| ()) {
            return self.report(&e);
        }
        let Some(amount) = self.prompt_amount()? else {
            return Ok(());
        };
        match self.app.use_favorite(index, amount).await {
            Ok(record) => {
                let rendered = convert::render_quote(&record);
                self.say(&format!("\n{rendered}"))
            }
            Err(e) => self.report(&e),
        }
    }

    fn remove_favorite(&mut self) -> Result<()> {
        let Some(index) =
            self.prompt_index("\nSelect the number of the currency pair to remove: ")?
        else {
            return Ok(());
        };
        match self.app.favorites.remove(index) {
            Ok(removed) => self.success(&format!("Removed '{removed}' from favorites list!")),
            Err(e) => self.report(&e),
        }
    }

    fn calculator(&mut self) -> Result<()> {
        self.say(&format!("\n{}", ui::heading("QUICK CALCULATOR")))?;
        let Some(lhs) = self.prompt_number("Enter first number: ")? else {
            return Ok(());
        };
        let Some(op) = self.prompt("Enter operation (+, -, *, /): ")? else {
            return Ok(());
        };
        let Some(rhs) = self.prompt_number("Enter second number: ")? else {
            return Ok(());
        };

        let calculated = op
            .parse::<Operation>()
            .and_then(|op| calculate(lhs, op, rhs).map(|result| (op, result)));
        match calculated {
            Ok((op, result)) => {
                let rendered = calculator::render_calculation(lhs, op, rhs, result);
                self.say(&format!("\n{rendered}"))
            }
            Err(e) => self.report(&e),
        }
    }

    fn rate_table(&mut self) -> Result<()> {
        let Some(base) = self.prompt_code("Enter base currency code (e.g., USD): ")? else {
            return Ok(());
        };
        match rates::render_rates(self.app.registry(), self.app.rates(), &base) {
            Ok(table) => self.say(&format!("\n{table}")),
            Err(e) => self.report(&e),
        }
    }

    fn clear_history(&mut self) -> Result<()> {
        self.say(&format!("\n{}", ui::heading("CLEAR HISTORY")))?;
        if self.app.history.is_empty() {
            return self.say("No history to clear.");
        }

        let question = format!(
            "Are you sure you want to delete {} history records? (y/n): ",
            self.app.history.len()
        );
        let answer = self.prompt(&question)?;
        if !answer.is_some_and(|a| a.eq_ignore_ascii_case("y")) {
            return self.say("Operation canceled.");
        }
        match self.app.clear_history() {
            Ok(()) => self.success("All history cleared!"),
            Err(e) => self.report(&e),
        }
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_code(&mut self, label: &str) -> Result<Option<String>> {
        Ok(self.prompt(label)?.map(|code| code.to_uppercase()))
    }

    fn prompt_number(&mut self, label: &str) -> Result<Option<Decimal>> {
        let Some(text) = self.prompt(label)? else {
            return Ok(None);
        };
        match text.parse::<Decimal>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.error("Invalid number!")?;
                Ok(None)
            }
        }
    }

    /// Non-positive amounts pass through so the converter reports them.
    fn prompt_amount(&mut self) -> Result<Option<Decimal>> {
        let Some(text) = self.prompt("Enter amount: ")? else {
            return Ok(None);
        };
        match text.parse::<Decimal>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.error("Invalid amount!")?;
                Ok(None)
            }
        }
    }

    fn prompt_index(&mut self, label: &str) -> Result<Option<usize>> {
        let Some(text) = self.prompt(label)? else {
            return Ok(None);
        };
        match text.parse::<usize>() {
            Ok(index) => Ok(Some(index)),
            Err(_) => {
                self.error("Invalid choice!")?;
                Ok(None)
            }
        }
    }

    fn flush_notices(&mut self) -> Result<()> {
        for notice in self.app.take_notices() {
            self.warning(&notice)?;
        }
        Ok(())
    }

    fn report(&mut self, e: &XchangeError) -> Result<()> {
        self.error(&format!("Error: {e}"))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn success(&mut self, text: &str) -> Result<()> {
        self.say(&ui::style_text(text, ui::StyleType::Success))
    }

    fn warning(&mut self, text: &str) -> Result<()> {
        self.say(&ui::style_text(text, ui::StyleType::Warning))
    }

    fn error(&mut self, text: &str) -> Result<()> {
        self.say(&ui::style_text(text, ui::StyleType::Error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AppConfig, Mode};
    use std::io::Cursor;

    fn app() -> App {
        let config = AppConfig {
            mode: Mode::InMemory,
            ..AppConfig::default()
        };
        App::new(&config).unwrap()
    }

    async fn run_script(app: App, script: &str) -> (App, String) {
        let mut output = Vec::new();
        let mut shell = Shell::new(app, Cursor::new(script.to_string()), &mut output);
        shell.run().await.unwrap();
        let Shell { app, .. } = shell;
        (app, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_convert_and_add_favorite() {
        let (app, output) = run_script(app(), "1\n100\nusd\neur\ny\n0\n").await;
        assert!(output.contains("Exchange rate: 1 USD = 0.8500 EUR"));
        assert!(output.contains("Added to favorites list!"));
        assert!(output.contains("Thank you for using Currency Converter!"));
        assert_eq!(app.history.len(), 1);
        assert!(app.favorites.contains("USD", "EUR"));
    }

    #[tokio::test]
    async fn test_invalid_inputs_are_reported() {
        let (app, output) = run_script(app(), "1\n-5\nUSD\nEUR\n1\nabc\n9\n1\n10\nUSD\nXYZ\n").await;
        assert!(output.contains("Error: Invalid amount: -5"));
        assert!(output.contains("Invalid amount!"));
        assert!(output.contains("Invalid choice!"));
        assert!(output.contains("Error: Unknown currency code: XYZ"));
        assert!(app.history.is_empty());
    }

    #[tokio::test]
    async fn test_identity_conversion_is_not_recorded() {
        let (app, output) = run_script(app(), "1\n42\nJPY\nJPY\n0\n").await;
        assert!(output.contains("Result: 42.00 JPY"));
        assert!(!output.contains("Add this currency pair"));
        assert!(app.history.is_empty());
    }

    #[tokio::test]
    async fn test_manage_favorites() {
        let script = "4\n1\nUSD\nVND\n4\n2\nUSD\nVND\n4\n1\n1\n10\n4\n3\n5\n4\n3\n1\n0\n";
        let (app, output) = run_script(app(), script).await;
        assert!(output.contains("Added 'USD → VND' to favorites!"));
        assert!(output.contains("already in the favorites list"));
        assert!(output.contains("10.00 USD = "));
        assert!(output.contains("235000.00"));
        assert!(output.contains("Error: Selection 5 is out of range (1-1)"));
        assert!(output.contains("Removed 'USD → VND' from favorites list!"));
        assert!(app.favorites.is_empty());
        // Quoting a favorite does not touch history
        assert!(app.history.is_empty());
    }

    #[tokio::test]
    async fn test_calculator_rates_and_clear() {
        let script = "5\n10\n/\n4\n5\n1\n/\n0\n6\nusd\n1\n10\nUSD\nGBP\nn\n7\ny\n3\n";
        let (app, output) = run_script(app(), script).await;
        assert!(output.contains("Result of division operation:"));
        assert!(output.contains("2.50"));
        assert!(output.contains("Error: Invalid operation: cannot divide by zero"));
        assert!(output.contains("Exchange rates from USD (US Dollar):"));
        assert!(output.contains("Are you sure you want to delete 1 history records?"));
        assert!(output.contains("All history cleared!"));
        assert!(output.contains("No conversion history yet."));
        assert!(app.history.is_empty());
    }
}
