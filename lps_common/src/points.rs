use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The number of stored units in one loyalty point. Amounts carry two decimal places.
pub const POINTS_SCALE: i64 = 100;

//--------------------------------------       Points        ---------------------------------------------------------
/// A loyalty points amount, stored as a whole number of hundredths of a point.
///
/// Floating point values only appear at the edges of the system (the accrual oracle's JSON and the HTTP API). They are
/// converted to and from `Points` with [`TryFrom<f64>`] and [`Points::as_f64`], and all arithmetic happens on the
/// integer representation, so balances never accumulate rounding errors.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Points(i64);

op!(binary Points, Add, add);
op!(binary Points, Sub, sub);
op!(inplace Points, AddAssign, add_assign);
op!(inplace Points, SubAssign, sub_assign);
op!(unary Points, Neg, neg);

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Value cannot be represented as loyalty points: {0}")]
pub struct PointsConversionError(String);

impl Points {
    pub const ZERO: Points = Points(0);

    /// Creates an amount from a raw count of hundredths of a point.
    pub const fn from_hundredths(value: i64) -> Self {
        Self(value)
    }

    /// Creates an amount from a whole number of points.
    pub const fn from_points(points: i64) -> Self {
        Self(points * POINTS_SCALE)
    }

    /// The raw count of hundredths of a point.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / POINTS_SCALE as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<f64> for Points {
    type Error = PointsConversionError;

    /// Rounds to the nearest hundredth. Negative and non-finite values are rejected.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PointsConversionError(format!("{value} is not a finite number")));
        }
        if value < 0.0 {
            return Err(PointsConversionError(format!("{value} is negative")));
        }
        let scaled = (value * POINTS_SCALE as f64).round();
        hundredths_from_scaled(scaled)
            .map(Self)
            .ok_or_else(|| PointsConversionError(format!("{value} is too large")))
    }
}

/// `i64::MAX as f64` rounds up to 2^63, which is already out of range, so the bound is exclusive.
fn hundredths_from_scaled(scaled: f64) -> Option<i64> {
    if scaled >= i64::MAX as f64 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(scaled as i64)
}

impl FromStr for Points {
    type Err = PointsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|e| PointsConversionError(format!("{s}: {e}")))?;
        Self::try_from(value)
    }
}

impl Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = POINTS_SCALE.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / scale, abs % scale)
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Points::try_from(value).map_err(DeError::custom)
    }
}
