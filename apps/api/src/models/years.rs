use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Years of experience held against a competence.
///
/// Stored as `NUMERIC(6,2)`: four integer digits, two fractional digits.
/// Values are kept at scale 2 so the same number renders identically on both
/// sides of the wire (`"2.50"`, never `2.4999999`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct YearsOfExperience(Decimal);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YearsError {
    #[error("years of experience cannot be negative")]
    Negative,
    #[error("years of experience allows at most {max} fractional digits")]
    TooPrecise { max: u32 },
    #[error("years of experience must not exceed {max}")]
    OutOfRange { max: Decimal },
    #[error("not a decimal number: {0}")]
    Parse(String),
}

impl YearsOfExperience {
    pub const SCALE: u32 = 2;

    /// 9999.99
    pub fn max() -> Decimal {
        Decimal::new(999_999, Self::SCALE)
    }

    pub fn zero() -> Self {
        Self(Decimal::new(0, Self::SCALE))
    }

    pub fn new(value: Decimal) -> Result<Self, YearsError> {
        if value < Decimal::ZERO {
            return Err(YearsError::Negative);
        }
        if value.normalize().scale() > Self::SCALE {
            return Err(YearsError::TooPrecise { max: Self::SCALE });
        }
        if value > Self::max() {
            return Err(YearsError::OutOfRange { max: Self::max() });
        }
        let mut fixed = value;
        fixed.rescale(Self::SCALE);
        Ok(Self(fixed))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl Default for YearsOfExperience {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for YearsOfExperience {
    type Error = YearsError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<YearsOfExperience> for Decimal {
    fn from(years: YearsOfExperience) -> Self {
        years.0
    }
}

impl FromStr for YearsOfExperience {
    type Err = YearsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| YearsError::Parse(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for YearsOfExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
