//! Decimal amounts for balances, transfers and rebates
//!
//! The broker API carries every amount as a decimal string. `Amount` keeps
//! the exact decimal value so nothing passes through floating point between
//! the wire and the dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Display};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Exact decimal amount, serialized as its wire string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Parse an amount from its decimal string form
    pub fn from_str_exact(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        Decimal::from_str(trimmed)
            .map(Amount)
            .map_err(|_| AmountError::InvalidValue(s.to_string()))
    }

    /// Parse an amount that must be strictly greater than zero
    pub fn positive(s: &str) -> Result<Self, AmountError> {
        let amount = Self::from_str_exact(s)?;
        if !amount.is_positive() {
            return Err(AmountError::NotPositive(s.to_string()));
        }
        Ok(amount)
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Amount(value)
    }

    pub fn to_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for values strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Wire form with trailing zeros removed ("10.500" becomes "10.5")
    pub fn to_wire_string(&self) -> String {
        self.0.normalize().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Invalid amount: {0}")]
    InvalidValue(String),
    #[error("Amount must be positive: {0}")]
    NotPositive(String),
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire_string())
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_exact(s)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}
