use super::ui;
use crate::core::converter::format_dp;
use crate::core::history::{self, HistoryStore};

pub fn render_history(store: &HistoryStore) -> String {
    let mut output = ui::heading("CONVERSION HISTORY");

    if store.is_empty() {
        output.push_str("\nNo conversion history yet.");
    } else {
        output.push_str(&format!(
            "\nDisplaying {} most recent conversions:\n",
            store.len()
        ));
        for (i, record) in store.records().iter().enumerate() {
            output.push_str(&format!("\n{:>2}. {}", i + 1, record));
        }
    }

    if let Some(path) = store.path() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("History file: {}", path.display()),
                ui::StyleType::Subtle
            )
        ));
    }

    match store.persisted() {
        Ok(entries) => {
            if let Some(stats) = history::statistics(&entries) {
                output.push_str(&format!(
                    "\n\n{}",
                    ui::style_text("STATISTICS:", ui::StyleType::Label)
                ));
                output.push_str(&format!("\n- Total conversions: {}", stats.count));
                let total = stats.total_amount.map_or_else(
                    || "too large to display".to_string(),
                    |total| format_dp(total, 2),
                );
                output.push_str(&format!("\n- Total amount converted: {total}"));
                output.push_str(&format!("\n- Most used source currency: {}", stats.top_from));
                output.push_str(&format!("\n- Most used target currency: {}", stats.top_to));
            }
        }
        Err(e) => output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Error reading history file: {e}"),
                ui::StyleType::Error
            )
        )),
    }

    output
}
