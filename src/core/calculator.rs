//! Four-function arithmetic for the quick calculator.

use crate::core::error::{Result, XchangeError};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "addition",
            Operation::Subtract => "subtraction",
            Operation::Multiply => "multiplication",
            Operation::Divide => "division",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Operation::Add => "+",
                Operation::Subtract => "-",
                Operation::Multiply => "*",
                Operation::Divide => "/",
            }
        )
    }
}

impl FromStr for Operation {
    type Err = XchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "+" => Ok(Operation::Add),
            "-" => Ok(Operation::Subtract),
            "*" => Ok(Operation::Multiply),
            "/" => Ok(Operation::Divide),
            other => Err(XchangeError::InvalidOperation(format!(
                "unsupported operator '{other}'"
            ))),
        }
    }
}

pub fn calculate(lhs: Decimal, op: Operation, rhs: Decimal) -> Result<Decimal> {
    let result = match op {
        Operation::Add => lhs.checked_add(rhs),
        Operation::Subtract => lhs.checked_sub(rhs),
        Operation::Multiply => lhs.checked_mul(rhs),
        Operation::Divide => {
            if rhs.is_zero() {
                return Err(XchangeError::InvalidOperation(
                    "cannot divide by zero".to_string(),
                ));
            }
            lhs.checked_div(rhs)
        }
    };
    result.ok_or_else(|| XchangeError::InvalidOperation(format!("{lhs} {op} {rhs} overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_operations() {
        assert_eq!(calculate(dec("1.5"), Operation::Add, dec("2")).unwrap(), dec("3.5"));
        assert_eq!(calculate(dec("1"), Operation::Subtract, dec("3")).unwrap(), dec("-2"));
        assert_eq!(calculate(dec("4"), Operation::Multiply, dec("2.5")).unwrap(), dec("10"));
        assert_eq!(calculate(dec("10"), Operation::Divide, dec("4")).unwrap(), dec("2.5"));
    }

    #[test]
    fn test_divide_by_zero() {
        let result = calculate(dec("1"), Operation::Divide, Decimal::ZERO);
        assert!(matches!(result, Err(XchangeError::InvalidOperation(_))));
    }

    #[test]
    fn test_overflow_is_invalid_operation() {
        let result = calculate(Decimal::MAX, Operation::Add, Decimal::MAX);
        assert!(matches!(result, Err(XchangeError::InvalidOperation(_))));
    }

    #[test]
    fn test_parse_operation() {
        assert_eq!(" * ".parse::<Operation>().unwrap(), Operation::Multiply);
        assert_eq!("/".parse::<Operation>().unwrap().name(), "division");
        assert!(matches!(
            "%".parse::<Operation>(),
            Err(XchangeError::InvalidOperation(_))
        ));
    }
}
