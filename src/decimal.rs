use crate::error_handling::*;
use rug::{Complete, Integer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Significant digits kept by a quotient that does not terminate.
pub const DIVISION_PRECISION: u32 = 28;

/// Largest written exponent accepted by the parser, e.g. `1e999999`.
pub const MAX_EXPONENT: i64 = 999_999;

/// An arbitrary-precision decimal number, `(-1)^negative * coefficient * 10^exponent`.
///
/// The coefficient keeps its trailing zeros, so the scale a number was
/// written with carries through arithmetic: `1.50 + 1` is `2.50`. Equality
/// is on that representation, which makes `1.0` and `1.00` different values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    negative: bool,
    coefficient: Integer,
    exponent: i64,
}

fn pow10(n: u32) -> Integer {
    Integer::u_pow_u(10, n).complete()
}

fn digit_count(n: &Integer) -> i64 {
    n.to_string_radix(10).len() as i64
}

/// Rounds a non-negative coefficient to `precision` digits, ties to even.
fn round_half_even(coefficient: Integer, exponent: i64, precision: u32) -> (Integer, i64) {
    let excess = digit_count(&coefficient) - precision as i64;
    if excess <= 0 {
        return (coefficient, exponent);
    }

    let divisor = pow10(excess as u32);
    let (mut quotient, remainder) = coefficient.div_rem(divisor.clone());
    match (remainder * 2u32).cmp(&divisor) {
        Ordering::Greater => quotient += 1u32,
        Ordering::Equal if quotient.is_odd() => quotient += 1u32,
        _ => {}
    }

    let mut exponent = exponent + excess;
    // 999..9 rounded up gains a digit
    if digit_count(&quotient) > precision as i64 {
        quotient /= 10u32;
        exponent += 1;
    }
    (quotient, exponent)
}

fn parse_exponent(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>()
        .ok()
        .filter(|exponent| exponent.abs() <= MAX_EXPONENT)
}

impl Decimal {
    pub fn is_zero(&self) -> bool {
        self.coefficient.cmp0() == Ordering::Equal
    }

    fn signed_at(&self, exponent: i64) -> Integer {
        let scaled = self.coefficient.clone() * pow10((self.exponent - exponent) as u32);
        if self.negative {
            -scaled
        } else {
            scaled
        }
    }

    /// Divides, rounding a non-terminating quotient to [`DIVISION_PRECISION`]
    /// significant digits. Returns `None` when `divisor` is zero.
    ///
    /// An exact quotient is reduced toward the exponent `self.exponent -
    /// divisor.exponent`, so `15 / 3` is `5` rather than `5.000...`.
    pub fn checked_div(self, divisor: Decimal) -> Option<Decimal> {
        if divisor.is_zero() {
            return None;
        }

        let negative = self.negative != divisor.negative;
        let ideal_exponent = self.exponent - divisor.exponent;
        if self.is_zero() {
            return Some(Decimal {
                negative,
                coefficient: Integer::new(),
                exponent: ideal_exponent,
            });
        }

        // Enough extra digits for a correctly rounded quotient.
        let shift = digit_count(&divisor.coefficient) - digit_count(&self.coefficient)
            + DIVISION_PRECISION as i64
            + 1;
        let (mut coefficient, remainder) = if shift >= 0 {
            (self.coefficient * pow10(shift as u32)).div_rem(divisor.coefficient)
        } else {
            self.coefficient
                .div_rem(divisor.coefficient * pow10((-shift) as u32))
        };
        let mut exponent = ideal_exponent - shift;

        if remainder.cmp0() != Ordering::Equal {
            // sticky digit so a discarded remainder never looks like an exact tie
            if coefficient.is_divisible_u(5) {
                coefficient += 1u32;
            }
        } else {
            while exponent < ideal_exponent && coefficient.is_divisible_u(10) {
                coefficient /= 10u32;
                exponent += 1;
            }
        }

        let (coefficient, exponent) = round_half_even(coefficient, exponent, DIVISION_PRECISION);
        Some(Decimal {
            negative,
            coefficient,
            exponent,
        })
    }
}

impl FromStr for Decimal {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CalcError::invalid_number(s.to_string());

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (mantissa, written_exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(at) => (
                &unsigned[..at],
                parse_exponent(&unsigned[at + 1..]).ok_or_else(invalid)?,
            ),
            None => (unsigned, 0),
        };

        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(invalid());
        }

        let coefficient =
            Integer::from_str_radix(&format!("{whole}{fraction}"), 10).map_err(|_| invalid())?;

        Ok(Decimal {
            negative,
            coefficient,
            exponent: written_exponent - fraction.len() as i64,
        })
    }
}

impl fmt::Display for Decimal {
    /// Plain notation when it stays readable, scientific (`1.5E+7`) otherwise.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = self.coefficient.to_string_radix(10);
        let length = digits.len() as i64;
        let left_digits = self.exponent + length;
        let dot_place = if self.exponent <= 0 && left_digits > -6 {
            left_digits
        } else {
            1
        };

        if self.negative {
            write!(f, "-")?;
        }

        if dot_place <= 0 {
            write!(f, "0.{}{}", "0".repeat((-dot_place) as usize), digits)?;
        } else if dot_place >= length {
            write!(f, "{}{}", digits, "0".repeat((dot_place - length) as usize))?;
        } else {
            let (whole, fraction) = digits.split_at(dot_place as usize);
            write!(f, "{whole}.{fraction}")?;
        }

        if left_digits != dot_place {
            write!(f, "E{:+}", left_digits - dot_place)?;
        }
        Ok(())
    }
}

/// Implements '+' operator, exactly
impl Add for Decimal {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let exponent = self.exponent.min(other.exponent);
        let sum = self.signed_at(exponent) + other.signed_at(exponent);
        let negative = if sum.cmp0() == Ordering::Equal {
            self.negative && other.negative
        } else {
            sum.cmp0() == Ordering::Less
        };

        Decimal {
            negative,
            coefficient: sum.abs(),
            exponent,
        }
    }
}

/// Implements binary '-' operator, exactly
impl Sub for Decimal {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

/// Implements '*' operator, exactly
impl Mul for Decimal {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Decimal {
            negative: self.negative != other.negative,
            coefficient: self.coefficient * other.coefficient,
            exponent: self.exponent + other.exponent,
        }
    }
}

/// Flips the sign, zero included
impl Neg for Decimal {
    type Output = Self;

    fn neg(self) -> Self {
        Decimal {
            negative: !self.negative,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_round_trips_written_form() {
        for text in ["0", "7", "-12", "10.5", "0.25", "0.00", "123.4500", "0.000001"] {
            assert_eq!(dec(text).to_string(), text);
        }
    }

    #[test]
    fn test_display_normalizes_spelling() {
        assert_eq!(dec("+5").to_string(), "5");
        assert_eq!(dec("007").to_string(), "7");
        assert_eq!(dec(".5").to_string(), "0.5");
        assert_eq!(dec("5.").to_string(), "5");
        assert_eq!(dec("1.5e2").to_string(), "1.5E+2");
        assert_eq!(dec("25e-1").to_string(), "2.5");
        assert_eq!(dec("-0").to_string(), "-0");
    }

    #[test]
    fn test_display_scientific() {
        assert_eq!(dec("1e3").to_string(), "1E+3");
        assert_eq!(dec("1.5E+7").to_string(), "1.5E+7");
        assert_eq!(dec("0.0000001").to_string(), "1E-7");
        assert_eq!(dec("-12e-10").to_string(), "-1.2E-9");
    }

    #[test]
    fn test_invalid_numbers() {
        for text in ["", "-", ".", "a", "1.2.3", "1e", "e5", "1e+", "nan", "inf", "1_000", "--1", "0x10", "1e9999999"] {
            assert!(
                matches!(text.parse::<Decimal>(), Err(CalcError::invalid_number(ref t)) if t == text),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_add_sub() {
        assert_eq!((dec("5") + dec("3")).to_string(), "8");
        assert_eq!((dec("10.5") - dec("2.7")).to_string(), "7.8");
        assert_eq!((dec("1.50") + dec("1")).to_string(), "2.50");
        assert_eq!((dec("0.1") + dec("0.2")).to_string(), "0.3");
        assert_eq!((dec("3") - dec("7")).to_string(), "-4");
        assert_eq!((dec("5") - dec("5")).to_string(), "0");
        assert_eq!((dec("-0") + dec("-0")).to_string(), "-0");
        assert_eq!((dec("1e3") + dec("1")).to_string(), "1001");
    }

    #[test]
    fn test_add_is_exact_beyond_division_precision() {
        let big = "123456789012345678901234567890123456789";
        assert_eq!((dec(big) + dec("1")).to_string(), "123456789012345678901234567890123456790");
    }

    #[test]
    fn test_mul() {
        assert_eq!((dec("4") * dec("6")).to_string(), "24");
        assert_eq!((dec("2.50") * dec("2")).to_string(), "5.00");
        assert_eq!((dec("-1.5") * dec("1.5")).to_string(), "-2.25");
        assert_eq!((dec("0") * dec("-3")).to_string(), "-0");
    }

    #[test]
    fn test_exact_division() {
        assert_eq!(dec("15").checked_div(dec("3")).unwrap().to_string(), "5");
        assert_eq!(dec("1").checked_div(dec("4")).unwrap().to_string(), "0.25");
        assert_eq!(dec("7.5").checked_div(dec("2.5")).unwrap().to_string(), "3");
        assert_eq!(dec("10").checked_div(dec("0.5")).unwrap().to_string(), "2E+1");
        assert_eq!(dec("0").checked_div(dec("5")).unwrap().to_string(), "0");
        assert_eq!(dec("-6").checked_div(dec("3")).unwrap().to_string(), "-2");
    }

    #[test]
    fn test_rounded_division() {
        assert_eq!(
            dec("1").checked_div(dec("3")).unwrap().to_string(),
            "0.3333333333333333333333333333"
        );
        assert_eq!(
            dec("2").checked_div(dec("3")).unwrap().to_string(),
            "0.6666666666666666666666666667"
        );
        assert_eq!(
            dec("-1").checked_div(dec("7")).unwrap().to_string(),
            "-0.1428571428571428571428571429"
        );
    }

    #[test]
    fn test_division_rounds_long_exact_quotients() {
        assert_eq!(
            dec("123456789012345678901234567890").checked_div(dec("1")).unwrap().to_string(),
            "1.234567890123456789012345679E+29"
        );
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(dec("5").checked_div(dec("0")), None);
        assert_eq!(dec("5").checked_div(dec("0.000")), None);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(Integer::from(125), 0, 2), (Integer::from(12), 1));
        assert_eq!(round_half_even(Integer::from(135), 0, 2), (Integer::from(14), 1));
        assert_eq!(round_half_even(Integer::from(126), 0, 2), (Integer::from(13), 1));
        assert_eq!(round_half_even(Integer::from(996), 0, 2), (Integer::from(10), 2));
        assert_eq!(round_half_even(Integer::from(12), 0, 2), (Integer::from(12), 0));
    }
}
