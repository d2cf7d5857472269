use super::ui;
use crate::core::currency::CurrencyRegistry;
use comfy_table::Cell;

pub fn render_currencies(registry: &CurrencyRegistry) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
    ]);

    for (i, currency) in registry.iter().enumerate() {
        table.add_row(vec![
            ui::number_cell(&(i + 1).to_string()),
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            Cell::new(&currency.symbol),
        ]);
    }

    format!(
        "{}\n{}\n\nTotal: {} currencies",
        ui::heading("CURRENCY LIST"),
        table,
        registry.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_currencies;

    #[test]
    fn test_render_currencies() {
        let registry = CurrencyRegistry::new(default_currencies());
        let output = render_currencies(&registry);
        assert!(output.contains("Vietnamese Dong"));
        assert!(output.contains("₩"));
        assert!(output.contains("Total: 14 currencies"));
    }
}
