//! Voting weight.
//!
//! Weights are plain non-negative integers. All arithmetic on tallies goes
//! through the checked operations so an overflowing tally is reported instead
//! of wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Voting weight of an address, or an accumulated tally of weights.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Weight(u128);

impl Weight {
    pub const ZERO: Self = Self(0);
    /// "One person one vote".
    pub const ONE: Self = Self(1);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl From<u128> for Weight {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
