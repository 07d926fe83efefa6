//! This module defines the unit types used for auction volumes.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::iter::Sum;
use std::num::FpCategory;

/// Represents a dimensionless quantity.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, derive_more::Add, derive_more::Sub)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    /// Express this ratio as a percentage
    pub fn as_percentage(self) -> f64 {
        self.0 * 100.0
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

/// An amount of money in euros.
///
/// Auction volumes are expressed as the monetary value of the electricity sold.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
)]
pub struct Money(pub f64);

impl Money {
    /// Zero euros
    pub const ZERO: Money = Money(0.0);

    /// Returns the value as a f64.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the amount is exactly zero
    pub fn is_zero(self) -> bool {
        self.0.classify() == FpCategory::Zero
    }

    /// The value in millions of euros
    pub fn millions(self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Total ordering over the underlying value (see [`f64::total_cmp`])
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl std::ops::Div for Money {
    type Output = Dimensionless;

    fn div(self, rhs: Money) -> Dimensionless {
        Dimensionless(self.0 / rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
