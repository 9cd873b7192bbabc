use crate::error::VendingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Represents an amount of inserted currency.
///
/// Balances are never negative: subtraction saturates at zero, callers that
/// need to know whether funds suffice compare first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance(pub u64);

/// Represents a strictly positive price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(pub(crate) u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self, VendingError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(VendingError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The input symbol that buys something at this price, e.g. `-3000`.
    pub fn purchase_symbol(&self) -> String {
        format!("-{}", self.0)
    }
}

impl TryFrom<u64> for Amount {
    type Error = VendingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Decodes the balance carried by a state identifier.
    ///
    /// Every ASCII digit of `name` is taken in order (`"q3000"` is 3000).
    /// A name without digits, or whose digits overflow `u64`, decodes to zero.
    pub fn decode(name: &str) -> Self {
        let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
        Self(digits.parse().unwrap_or(0))
    }

    pub fn covers(&self, price: Amount) -> bool {
        self.0 >= price.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}
