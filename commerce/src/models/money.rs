use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Largest amount a listing or bid may carry, in cents.
pub const MAX_CENTS: u64 = 999_999;

/// Fixed-point amount with two fractional digits, stored as cents.
///
/// Serialized as a decimal string (`"10.50"`) both on the wire and in the
/// item tables, so equality checks in conditional writes compare canonical
/// text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = String, example = "10.00")]
pub struct Price(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("Price must be a non-negative decimal such as 12.50")]
    Malformed,
    #[error("Price must have at most 2 decimal places")]
    TooPrecise,
    #[error("Price must not exceed 9999.99")]
    TooLarge,
}

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: u64) -> Result<Self, PriceError> {
        if cents > MAX_CENTS {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(cents))
    }

    pub fn cents(self) -> u64 {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(PriceError::Malformed);
        }
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(whole) || !is_digits(frac) {
            return Err(PriceError::Malformed);
        }
        if frac.len() > 2 {
            return Err(PriceError::TooPrecise);
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > 4 {
            return Err(PriceError::TooLarge);
        }
        let units: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| PriceError::Malformed)?
        };
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| PriceError::Malformed)? * 10,
            _ => frac.parse().map_err(|_| PriceError::Malformed)?,
        };

        Self::from_cents(units * 100 + cents)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Clients may send either "12.50" or 12.5.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) if n.is_finite() && n >= 0.0 => n.to_string(),
            Raw::Number(_) => return Err(serde::de::Error::custom(PriceError::Malformed)),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}
