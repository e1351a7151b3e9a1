use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use crate::{EngineError, FieldError, FieldErrorKind};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// sums, caps) to avoid floating-point drift in currency arithmetic.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from API input (rejects more than 2 fraction digits):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount a single expense may carry: 1,000,000.00.
    pub const MAX_EXPENSE: Money = Money(100_000_000);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns the amount in currency units as a float.
    ///
    /// Only for the serialization boundary (summary numerics, chart
    /// heights); all arithmetic stays in cents.
    #[must_use]
    pub fn units(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl fmt::Display for Money {
    /// Formats as a plain two-decimal string, e.g. `12.34`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts an optional leading `-` and at most 2 fractional digits
    /// after a `.` separator; rejects empty or non-numeric strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |message: &str| {
            EngineError::Validation(vec![FieldError::new(
                "amount",
                FieldErrorKind::InvalidAmount,
                message,
            )])
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(fail("amount must not be empty"));
        }

        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (-1i64, stripped),
            None => (1i64, trimmed),
        };
        if rest.is_empty() {
            return Err(fail("invalid amount"));
        }

        let mut parts = rest.split('.');
        let units_str = parts.next().unwrap_or_default();
        let cents_str = parts.next();
        if parts.next().is_some() {
            return Err(fail("invalid amount"));
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(fail("invalid amount"));
        }
        // All-digit input can only fail to parse by overflowing i64.
        let units: i64 = units_str.parse().map_err(|_| fail("amount too large"))?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(fail("invalid amount"));
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| fail("invalid amount"))? * 10,
                    2 => frac.parse::<i64>().map_err(|_| fail("invalid amount"))?,
                    _ => return Err(fail("amounts carry at most two decimals")),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(|| fail("amount too large"))?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(|| fail("amount too large"))?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_plain_decimals() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10.50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().cents(), -1);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
    }

    #[test]
    fn parse_reports_overflowing_amounts_as_too_large() {
        for input in ["9999999999999999999999999", "92233720368547758.08"] {
            match input.parse::<Money>().unwrap_err() {
                EngineError::Validation(fields) => {
                    assert_eq!(fields[0].message, "amount too large");
                }
                other => panic!("expected a validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn trailing_separator_means_zero_cents() {
        assert_eq!("1.".parse::<Money>().unwrap().cents(), 100);
    }

    #[test]
    fn parse_round_trips_display() {
        let amount: Money = "1000000.00".parse().unwrap();
        assert_eq!(amount, Money::MAX_EXPENSE);
        assert_eq!(amount.to_string().parse::<Money>().unwrap(), amount);
    }
}
