use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Monetary amount in minor units (centavos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Amount overflow")]
    Overflow,
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts a floating point amount in major units, rounding to the
    /// nearest cent. Non-finite input becomes zero.
    pub fn from_major(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::ZERO;
        }
        Money((amount * 100.0).round() as i64)
    }

    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Parses `1200`, `1200.5`, `1200,50`, `1.200,50` or `R$ 1.200,50`.
    ///
    /// When a comma is present it is the decimal separator and dots are
    /// thousands separators; otherwise a dot is the decimal separator.
    pub fn parse(input: &str) -> Result<Money, MoneyError> {
        let trimmed = input.trim().trim_start_matches("R$").trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim()),
            None => (false, trimmed),
        };

        let normalized: String = if body.contains(',') {
            body.chars().filter(|c| *c != '.').map(|c| if c == ',' { '.' } else { c }).collect()
        } else {
            body.to_string()
        };

        let mut parts = normalized.splitn(2, '.');
        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();

        if whole.is_empty() && fraction.is_empty() {
            return Err(MoneyError::Invalid(input.to_string()));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || fraction.len() > 2
        {
            return Err(MoneyError::Invalid(input.to_string()));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyError::Overflow)?
        };
        let fraction_value: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| MoneyError::Invalid(input.to_string()))? * 10,
            _ => fraction.parse().map_err(|_| MoneyError::Invalid(input.to_string()))?,
        };

        let cents = whole_value
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction_value))
            .ok_or(MoneyError::Overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Multiplies a unit price by a quantity, rounding half away from zero
    /// to the nearest cent.
    pub fn times(self, quantity: Quantity) -> Money {
        let product = self.0 as i128 * quantity.milli() as i128;
        let rounded = if product >= 0 {
            (product + 500) / 1000
        } else {
            (product - 500) / 1000
        };
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// Brazilian real formatting: `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let whole = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {},{:02}", sign, grouped, cents)
    }
}

/// Non-negative item quantity stored in thousandths so fractional
/// quantities (2.5 m², 0.75 h) stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn from_milli(milli: u32) -> Self {
        Quantity(milli)
    }

    pub const fn units(units: u32) -> Self {
        Quantity(units.saturating_mul(1000))
    }

    pub const fn milli(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl TryFrom<f64> for Quantity {
    type Error = MoneyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(MoneyError::InvalidQuantity(value.to_string()));
        }
        let milli = (value * 1000.0).round();
        if milli > u32::MAX as f64 {
            return Err(MoneyError::InvalidQuantity(value.to_string()));
        }
        Ok(Quantity(milli as u32))
    }
}

impl From<Quantity> for f64 {
    fn from(q: Quantity) -> f64 {
        q.as_f64()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}", self.0 / 1000)
        } else {
            let text = format!("{:.3}", self.as_f64());
            write!(f, "{}", text.trim_end_matches('0'))
        }
    }
}
