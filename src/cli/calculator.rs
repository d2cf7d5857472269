use super::ui;
use crate::core::calculator::Operation;
use crate::core::converter::format_dp;
use rust_decimal::Decimal;

pub fn render_calculation(lhs: Decimal, op: Operation, rhs: Decimal, result: Decimal) -> String {
    format!(
        "Result of {} operation:\n{} {} {} = {}",
        op.name(),
        lhs,
        op,
        rhs,
        ui::style_text(&format_dp(result, 2), ui::StyleType::Value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_calculation() {
        let output = render_calculation(
            Decimal::from(10),
            Operation::Divide,
            Decimal::from(3),
            Decimal::from(10) / Decimal::from(3),
        );
        assert!(output.contains("Result of division operation:"));
        assert!(output.contains("10 / 3 = "));
        assert!(output.contains("3.33"));
    }
}
