use super::ui;
use crate::App;
use crate::core::converter::{ConversionRecord, format_dp};
use crate::core::currency::CurrencyRegistry;
use anyhow::Result;
use rust_decimal::Decimal;

/// Renders a conversion result block.
pub fn render_conversion(record: &ConversionRecord, registry: &CurrencyRegistry) -> String {
    let amount = format_dp(record.amount, 2);
    if record.is_identity() {
        return format!(
            "{} {} {}",
            ui::style_text("Result:", ui::StyleType::Label),
            amount,
            record.from
        );
    }

    let name_of = |code: &str| {
        registry
            .get(code)
            .map_or_else(|| code.to_string(), |c| c.name.clone())
    };
    let symbol = registry.get(&record.to).map_or("", |c| c.symbol.as_str());
    let result = format_dp(record.result, 2);

    let mut output = ui::heading("CONVERSION RESULT");
    output.push_str(&format!(
        "\nOriginal amount: {} {} ({})",
        amount,
        record.from,
        name_of(&record.from)
    ));
    output.push_str(&format!(
        "\nExchange rate: 1 {} = {} {}",
        record.from,
        format_dp(record.rate, 4),
        record.to
    ));
    output.push_str(&format!(
        "\nResult: {} {} ({})",
        ui::style_text(&result, ui::StyleType::Value),
        record.to,
        name_of(&record.to)
    ));
    output.push_str(&format!("\nSymbol: {symbol}{result}"));
    output
}

/// Renders the short form used when quoting a favorite pair.
pub fn render_quote(record: &ConversionRecord) -> String {
    format!(
        "{} {} = {} {}\nExchange rate: {}",
        format_dp(record.amount, 2),
        record.from,
        ui::style_text(&format_dp(record.result, 2), ui::StyleType::Value),
        record.to,
        format_dp(record.rate, 4)
    )
}

pub async fn run(app: &mut App, amount: Decimal, from: &str, to: &str) -> Result<()> {
    let spinner = app
        .is_remote()
        .then(|| ui::new_spinner("Fetching exchange rate..."));
    let result = app.convert(amount, from, to).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let record = result?;
    println!("{}", render_conversion(&record, app.registry()));
    ui::print_notices(&app.take_notices());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_currencies;
    use chrono::Local;

    fn record(amount: &str, from: &str, to: &str, rate: &str) -> ConversionRecord {
        let amount: Decimal = amount.parse().unwrap();
        let rate: Decimal = rate.parse().unwrap();
        ConversionRecord {
            timestamp: Local::now().naive_local(),
            amount,
            from: from.to_string(),
            to: to.to_string(),
            rate,
            result: amount * rate,
        }
    }

    #[test]
    fn test_render_conversion() {
        let registry = CurrencyRegistry::new(default_currencies());
        let output = render_conversion(&record("100", "USD", "EUR", "0.85"), &registry);
        assert!(output.contains("CONVERSION RESULT"));
        assert!(output.contains("Original amount: 100.00 USD (US Dollar)"));
        assert!(output.contains("Exchange rate: 1 USD = 0.8500 EUR"));
        assert!(output.contains("85.00"));
        assert!(output.contains("EUR (Euro)"));
        assert!(output.contains("Symbol: €85.00"));
    }

    #[test]
    fn test_render_identity_conversion() {
        let registry = CurrencyRegistry::new(default_currencies());
        let output = render_conversion(&record("12.5", "JPY", "JPY", "1"), &registry);
        assert!(output.contains("12.50 JPY"));
        assert!(!output.contains("Exchange rate"));
    }

    #[test]
    fn test_render_quote() {
        let output = render_quote(&record("10", "USD", "VND", "23500"));
        assert!(output.contains("10.00 USD = "));
        assert!(output.contains("235000.00"));
        assert!(output.contains("Exchange rate: 23500.0000"));
    }
}
