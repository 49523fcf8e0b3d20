use crate::decimal::Decimal;
use crate::error_handling::*;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    addition,
    subtraction,
    multiplication,
    division,
}

impl BinaryOperator {
    pub fn call(&self, left: Decimal, right: Decimal) -> Result<Decimal> {
        use BinaryOperator::*;

        match self {
            addition => Ok(left + right),
            subtraction => Ok(left - right),
            multiplication => Ok(left * right),
            division => left.checked_div(right).ok_or(CalcError::division_by_zero),
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        use BinaryOperator::*;
        match s {
            "+" => Ok(addition),
            "-" => Ok(subtraction),
            "*" => Ok(multiplication),
            "/" => Ok(division),
            _ => Err(CalcError::unknown_operator(s.to_string())),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BinaryOperator::*;
        let symbol = match self {
            addition => "+",
            subtraction => "-",
            multiplication => "*",
            division => "/",
        };
        write!(f, "{symbol}")
    }
}

/// `number operator number`, split on whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    pub left: Decimal,
    pub operator: BinaryOperator,
    pub right: Decimal,
}

impl FromStr for Expression {
    type Err = CalcError;

    /// Both operands are checked before the operator, so `a $ 3` reports
    /// the number rather than the operator.
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [left, operator, right] = tokens[..] else {
            return Err(CalcError::malformed_input);
        };

        let left: Decimal = left.parse()?;
        let right: Decimal = right.parse()?;
        let operator: BinaryOperator = operator.parse()?;
        Ok(Expression { left, operator, right })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operators() {
        use BinaryOperator::*;
        for (symbol, operator) in [("+", addition), ("-", subtraction), ("*", multiplication), ("/", division)] {
            assert_eq!(symbol.parse::<BinaryOperator>().unwrap(), operator);
            assert_eq!(operator.to_string(), symbol);
        }
    }

    #[test]
    fn test_unknown_operator_carries_token() {
        assert!(matches!(
            "^".parse::<BinaryOperator>(),
            Err(CalcError::unknown_operator(op)) if op == "^"
        ));
    }

    #[test]
    fn test_expression() {
        let expression: Expression = "  10.5   -\t2.7 ".parse().unwrap();
        assert_eq!(expression.operator, BinaryOperator::subtraction);
        assert_eq!(expression.left.to_string(), "10.5");
        assert_eq!(expression.right.to_string(), "2.7");
    }

    #[test]
    fn test_token_count() {
        for input in ["", "5", "5+3", "5 +", "5 + 3 + 1"] {
            assert!(
                matches!(input.parse::<Expression>(), Err(CalcError::malformed_input)),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_numbers_checked_before_operator() {
        assert!(matches!(
            "a $ 3".parse::<Expression>(),
            Err(CalcError::invalid_number(n)) if n == "a"
        ));
        assert!(matches!(
            "1 $ b".parse::<Expression>(),
            Err(CalcError::invalid_number(n)) if n == "b"
        ));
    }
}
