use super::ui;
use crate::core::converter::format_dp;
use crate::core::currency::CurrencyRegistry;
use crate::core::error::{Result, XchangeError};
use crate::core::rates::RateTable;
use comfy_table::Cell;

/// Renders every rate quoted from `base`, sorted by target code.
pub fn render_rates(registry: &CurrencyRegistry, table: &RateTable, base: &str) -> Result<String> {
    let base_currency = registry
        .get(base)
        .ok_or_else(|| XchangeError::UnknownCurrency(base.to_string()))?;
    let rates = table.rates_from(base)?;

    let mut output_table = ui::new_styled_table();
    output_table.set_header(vec![
        ui::header_cell("Target"),
        ui::header_cell(&format!("1 {base} =")),
        ui::header_cell("Name"),
        ui::header_cell("Source"),
    ]);

    for (target, entry) in &rates {
        let name = registry.get(target).map_or("", |c| c.name.as_str());
        let source = if entry.derived {
            ui::subtle_cell("derived")
        } else {
            Cell::new("explicit")
        };
        output_table.add_row(vec![
            Cell::new(target),
            ui::number_cell(&format_dp(entry.rate, 4)),
            Cell::new(name),
            source,
        ]);
    }

    Ok(format!(
        "{}\nExchange rates from {} ({}):\n{}",
        ui::heading("EXCHANGE RATES TABLE"),
        base,
        base_currency.name,
        output_table
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{default_currencies, default_rates};

    #[test]
    fn test_render_rates() {
        let registry = CurrencyRegistry::new(default_currencies());
        let table = RateTable::new(&registry, &default_rates()).unwrap();

        let output = render_rates(&registry, &table, "USD").unwrap();
        assert!(output.contains("Exchange rates from USD (US Dollar):"));
        assert!(output.contains("0.8500"));
        assert!(output.contains("23500.0000"));

        let output = render_rates(&registry, &table, "JPY").unwrap();
        assert!(output.contains("derived"));
        assert!(output.contains("0.0091"));
    }

    #[test]
    fn test_render_rates_unknown_base() {
        let registry = CurrencyRegistry::new(default_currencies());
        let table = RateTable::new(&registry, &default_rates()).unwrap();
        assert!(matches!(
            render_rates(&registry, &table, "XYZ"),
            Err(XchangeError::UnknownCurrency(_))
        ));
    }
}
