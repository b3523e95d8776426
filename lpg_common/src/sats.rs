use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const BTC_CURRENCY_CODE: &str = "BTC";
pub const SATS_PER_BTC: i64 = 100_000_000;

//--------------------------------------        Sats         ---------------------------------------------------------
/// An amount of bitcoin, denominated in satoshis.
///
/// The value is signed so that ledger adjustments (refunds, reversals) can be expressed with the same type.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Sats(i64);

op!(binary Sats, Add, add);
op!(binary Sats, Sub, sub);
op!(inplace Sats, AddAssign, add_assign);
op!(inplace Sats, SubAssign, sub_assign);
op!(unary Sats, Neg, neg);

impl Sum for Sats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in sats: {0}")]
pub struct SatsConversionError(String);

impl From<i64> for Sats {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Sats {
    type Error = SatsConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| SatsConversionError(format!("Value {value} is too large to convert to Sats")))
    }
}

impl Display for Sats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.abs() < SATS_PER_BTC / 100 {
            write!(f, "{} sats", self.0)
        } else {
            let btc = self.0 as f64 / SATS_PER_BTC as f64;
            write!(f, "{btc:0.8} {BTC_CURRENCY_CODE}")
        }
    }
}

impl Sats {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_btc(btc: i64) -> Self {
        Self(btc * SATS_PER_BTC)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}
