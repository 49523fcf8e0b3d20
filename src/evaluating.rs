use crate::decimal::Decimal;
use crate::error_handling::*;
use crate::parsing::*;

/// Evaluates a `number operator number` expression.
///
/// `+`, `-` and `*` are exact. `/` rounds a non-terminating quotient to
/// 28 significant digits, ties to even.
pub fn evaluate(expression: &str) -> Result<Decimal> {
    let Expression { left, operator, right } = expression.parse()?;
    operator.call(left, right)
}
