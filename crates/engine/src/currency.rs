use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code used by a trip and its money values.
///
/// A trip is mono-currency: every expense, balance and transfer of a
/// settlement is expressed in the same currency.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of the currency's
/// **smallest unit** (see [`Money`](crate::Money)). `minor_units()` returns how
/// many decimal digits separate the major unit used for human input/output
/// from the stored integer:
///
/// - VND has no minor unit, so `300000 ₫` ⇄ `300000`.
/// - EUR has 2 minor units, so `10.50 €` ⇄ `1050`.
///
/// Rounding in the accumulator always happens on the smallest unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Vnd,
    Eur,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Vnd => 0,
            Currency::Eur | Currency::Usd => 2,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Vnd => "₫",
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }

    /// `10^minor_units`, i.e. how many smallest units make one major unit.
    pub(crate) const fn scale(self) -> i64 {
        let mut scale = 1i64;
        let mut digits = self.minor_units();
        while digits > 0 {
            scale *= 10;
            digits -= 1;
        }
        scale
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "VND" => Ok(Currency::Vnd),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
