//! Validated scalar types
//!
//! Probabilities and firefighter skills are plain `f64` values with a legal
//! domain. Wrapping them once at the configuration boundary means the tick
//! loop can hand them straight to the RNG without re-checking.
//!
//! Both types deserialize through `TryFrom<f64>`, so an out-of-range value in
//! a configuration file is rejected with a [`ConfigError`] rather than
//! accepted and clamped.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// A probability in the closed interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Never happens
    pub const ZERO: Probability = Probability(0.0);

    /// Always happens
    pub const ONE: Probability = Probability(1.0);

    /// Create a probability. Asserts value is within [0, 1].
    ///
    /// Intended for constants; use [`Probability::try_new`] for user input.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0 && value <= 1.0,
            "Probability::new: value not in [0, 1]"
        );
        Probability(value)
    }

    /// Validate a user-supplied probability.
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] for values outside `[0, 1]` or NaN.
    pub fn try_new(value: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Probability(value))
        } else {
            Err(ConfigError::out_of_range("probability", value, "[0, 1]"))
        }
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Deref for Probability {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Eq for Probability {}

impl PartialOrd for Probability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probability {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Probability::try_new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> f64 {
        p.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Firefighter skill in the open interval `(0, 1)`.
///
/// Fixed at creation. A bound firefighter restores `skill × suppression_factor`
/// vitality per tick on the parcel it is suppressing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Skill(f64);

impl Skill {
    /// Validate a skill level.
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] unless `0 < value < 1`.
    pub fn try_new(value: f64) -> Result<Self, ConfigError> {
        if value > 0.0 && value < 1.0 {
            Ok(Skill(value))
        } else {
            Err(ConfigError::out_of_range("skill", value, "(0, 1)"))
        }
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Deref for Skill {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl TryFrom<f64> for Skill {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Skill::try_new(value)
    }
}

impl From<Skill> for f64 {
    fn from(s: Skill) -> f64 {
        s.0
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bounds() {
        assert!(Probability::try_new(0.0).is_ok());
        assert!(Probability::try_new(1.0).is_ok());
        assert!(Probability::try_new(-0.1).is_err());
        assert!(Probability::try_new(1.01).is_err());
        assert!(Probability::try_new(f64::NAN).is_err());
    }

    #[test]
    fn test_skill_is_open_interval() {
        assert!(Skill::try_new(0.0).is_err());
        assert!(Skill::try_new(1.0).is_err());
        assert_eq!(*Skill::try_new(0.5).unwrap(), 0.5);
    }

    #[test]
    fn test_probability_rejected_on_deserialize() {
        let ok: Probability = serde_json::from_str("0.3").unwrap();
        assert_eq!(ok.value(), 0.3);
        assert!(serde_json::from_str::<Probability>("-0.5").is_err());
    }

    #[test]
    fn test_probability_ordering() {
        assert!(Probability::new(0.2) < Probability::new(0.7));
        assert_eq!(Probability::ZERO.max(Probability::ONE), Probability::ONE);
    }
}
