use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RateError;

/// Calendar year whose rate schedule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum PolicyYear {
    Y2025,
    Y2026,
}

impl PolicyYear {
    pub const ALL: [PolicyYear; 2] = [Self::Y2025, Self::Y2026];

    pub fn value(&self) -> i32 {
        match self {
            Self::Y2025 => 2025,
            Self::Y2026 => 2026,
        }
    }

    /// The year whose schedule follows this one, if it is modelled.
    pub fn following(&self) -> Option<Self> {
        match self {
            Self::Y2025 => Some(Self::Y2026),
            Self::Y2026 => None,
        }
    }
}

impl TryFrom<i32> for PolicyYear {
    type Error = RateError;

    fn try_from(year: i32) -> Result<Self, Self::Error> {
        match year {
            2025 => Ok(Self::Y2025),
            2026 => Ok(Self::Y2026),
            other => Err(RateError::UnsupportedYear(other)),
        }
    }
}

impl From<PolicyYear> for i32 {
    fn from(year: PolicyYear) -> Self {
        year.value()
    }
}

impl fmt::Display for PolicyYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A policy value that differs between the modelled years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerYear<T> {
    #[serde(rename = "2025")]
    pub y2025: T,
    #[serde(rename = "2026")]
    pub y2026: T,
}

impl<T> PerYear<T> {
    pub fn new(
        y2025: T,
        y2026: T,
    ) -> Self {
        Self { y2025, y2026 }
    }

    pub fn get(
        &self,
        year: PolicyYear,
    ) -> &T {
        match year {
            PolicyYear::Y2025 => &self.y2025,
            PolicyYear::Y2026 => &self.y2026,
        }
    }
}

impl<T: Clone> PerYear<T> {
    /// The same value for every year.
    pub fn uniform(value: T) -> Self {
        Self {
            y2025: value.clone(),
            y2026: value,
        }
    }
}
