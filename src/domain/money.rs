use crate::error::LedgerError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Number of decimal places monetary values are shown with.
pub const DISPLAY_SCALE: u32 = 2;

/// A monetary value kept at full decimal precision.
///
/// Arithmetic never rounds. Use [`Money::rounded`] only when a value leaves the
/// ledger (summaries, CLI output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Money(pub Decimal);

/// A strictly positive amount, used for order prices and payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidArgument(format!(
                "amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Money {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounds to display precision, midpoint away from zero, always with
    /// exactly [`DISPLAY_SCALE`] decimal places.
    pub fn rounded(&self) -> Decimal {
        let mut value = self
            .0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(DISPLAY_SCALE);
        value
    }

    /// Addition that reports overflow instead of panicking.
    pub fn checked_add(self, rhs: Self) -> Result<Self, LedgerError> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "adding {} to {} exceeds the representable amount",
                rhs.0, self.0
            ))
        })
    }

    /// Clamps negative values to zero. Only meant for presentation.
    pub fn floored(self) -> Self {
        if self.0 < Decimal::ZERO {
            Self::ZERO
        } else {
            self
        }
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}
