use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine};

/// Signed money amount represented as an integer count of the currency's
/// **smallest unit** (dong for VND, cents for EUR).
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// custom shares, balances, transfers) to avoid floating-point drift.
///
/// The value is signed when used as a balance:
/// - positive = the participant is owed money
/// - negative = the participant owes money
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(300_000);
/// assert_eq!(amount.minor(), 300_000);
/// assert_eq!(amount.format(Currency::Vnd), "300,000 ₫");
/// assert_eq!(Money::new(1234).format(Currency::Eur), "12.34 €");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more decimals than the currency has):
///
/// ```rust
/// use engine::{Currency, Money};
///
/// assert_eq!(Money::parse_major("10,5", Currency::Eur).unwrap().minor(), 1050);
/// assert!(Money::parse_major("12.345", Currency::Eur).is_err());
/// assert!(Money::parse_major("1.5", Currency::Vnd).is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from smallest units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in smallest units.
    #[must_use]
    pub const fn minor(self) -> i64 {
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

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value; `i64::MIN` saturates to `i64::MAX`.
    #[must_use]
    pub const fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Divides the amount among `count` people, rounding the share to the
    /// nearest smallest unit (halves round away from zero).
    ///
    /// Returns `None` when `count` is zero.
    ///
    /// ```rust
    /// use engine::Money;
    ///
    /// assert_eq!(Money::new(300_000).split_evenly(3), Some(Money::new(100_000)));
    /// assert_eq!(Money::new(100).split_evenly(3), Some(Money::new(33)));
    /// assert_eq!(Money::new(5).split_evenly(2), Some(Money::new(3)));
    /// assert_eq!(Money::new(5).split_evenly(0), None);
    /// ```
    #[must_use]
    pub fn split_evenly(self, count: usize) -> Option<Money> {
        if count == 0 {
            return None;
        }
        let count = count as i128;
        let magnitude = i128::from(self.0).abs();
        let share = (2 * magnitude + count) / (2 * count);
        let share = i64::try_from(share).ok()?;
        Some(Money(if self.0 < 0 { -share } else { share }))
    }

    /// Parses a decimal string expressed in major units of `currency`.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - at most `currency.minor_units()` fractional digits
    /// - rejects empty/invalid strings
    pub fn parse_major(s: &str, currency: Currency) -> ResultEngine<Money> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {}", s.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| overflow())?;

        let digits = usize::from(currency.minor_units());
        let minor: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > digits {
                    return Err(EngineError::InvalidAmount(format!(
                        "too many decimals for {}",
                        currency.code()
                    )));
                }
                let padded = format!("{frac:0<digits$}");
                padded.parse::<i64>().map_err(|_| invalid())?
            }
        };

        let total = major
            .checked_mul(currency.scale())
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }

    /// Formats the amount in major units with thousands separators and the
    /// currency symbol, e.g. `300,000 ₫` or `-12.50 €`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = currency.scale().unsigned_abs();
        let major = group_thousands(abs / scale);
        let digits = usize::from(currency.minor_units());
        if digits == 0 {
            format!("{sign}{major} {}", currency.symbol())
        } else {
            let minor = abs % scale;
            format!("{sign}{major}.{minor:0digits$} {}", currency.symbol())
        }
    }
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (idx, ch) in raw.chars().enumerate() {
        if idx > 0 && (raw.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_groups_thousands() {
        assert_eq!(Money::new(0).format(Currency::Vnd), "0 ₫");
        assert_eq!(Money::new(999).format(Currency::Vnd), "999 ₫");
        assert_eq!(Money::new(1_000).format(Currency::Vnd), "1,000 ₫");
        assert_eq!(Money::new(-1_250_000).format(Currency::Vnd), "-1,250,000 ₫");
        assert_eq!(Money::new(1).format(Currency::Eur), "0.01 €");
        assert_eq!(Money::new(123_456_78).format(Currency::Usd), "123,456.78 $");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        let eur = Currency::Eur;
        assert_eq!(Money::parse_major("10", eur).unwrap().minor(), 1000);
        assert_eq!(Money::parse_major("10.5", eur).unwrap().minor(), 1050);
        assert_eq!(Money::parse_major("10,50", eur).unwrap().minor(), 1050);
        assert_eq!(Money::parse_major("-0.01", eur).unwrap().minor(), -1);
        assert_eq!(Money::parse_major("+1.00", eur).unwrap().minor(), 100);
        assert_eq!(Money::parse_major("  2.30 ", eur).unwrap().minor(), 230);
        assert_eq!(Money::parse_major("300000", Currency::Vnd).unwrap().minor(), 300_000);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Money::parse_major("", Currency::Eur).is_err());
        assert!(Money::parse_major("-", Currency::Eur).is_err());
        assert!(Money::parse_major("1.2.3", Currency::Eur).is_err());
        assert!(Money::parse_major("abc", Currency::Eur).is_err());
        assert!(Money::parse_major("12.345", Currency::Eur).is_err());
        assert!(Money::parse_major("300000.5", Currency::Vnd).is_err());
    }

    #[test]
    fn split_evenly_rounds_half_away_from_zero() {
        assert_eq!(Money::new(10).split_evenly(4), Some(Money::new(3)));
        assert_eq!(Money::new(9).split_evenly(4), Some(Money::new(2)));
        assert_eq!(Money::new(-10).split_evenly(4), Some(Money::new(-3)));
        assert_eq!(Money::new(0).split_evenly(7), Some(Money::ZERO));
    }

    #[test]
    fn sums_over_iterators() {
        let total: Money = [Money::new(1), Money::new(-3), Money::new(5)].iter().sum();
        assert_eq!(total, Money::new(3));
    }
}
