//! Configuration types for the scoring system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Allowed distance between the weight total and 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// One of the four factors combined into the priority score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Urgency,
    Importance,
    Effort,
    Dependencies,
}

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::Urgency,
        Factor::Importance,
        Factor::Effort,
        Factor::Dependencies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Urgency => "urgency",
            Factor::Importance => "importance",
            Factor::Effort => "effort",
            Factor::Dependencies => "dependencies",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Factor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Factor::ALL
            .into_iter()
            .find(|factor| factor.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Errors raised while building a weight configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightsError {
    #[error("Invalid weight keys: {}. Valid keys are: urgency, importance, effort, dependencies", .0.join(", "))]
    UnknownKeys(Vec<String>),
    #[error("Weights must sum to 1.0, but sum to {total}. Current weights: {weights}")]
    BadSum { total: f64, weights: Weights },
    #[error("Weight '{factor}' must be non-negative, got {value}")]
    Negative { factor: Factor, value: f64 },
    #[error("Weight '{factor}' must be a finite number, got {value}")]
    NonFinite { factor: Factor, value: f64 },
}

/// Per-factor weights for the priority score.
///
/// Built once through [`Weights::from_overrides`] or [`Weights::validated`] and
/// never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            urgency: 0.40,
            importance: 0.30,
            effort: 0.15,
            dependencies: 0.15,
        }
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{urgency: {}, importance: {}, effort: {}, dependencies: {}}}",
            self.urgency, self.importance, self.effort, self.dependencies
        )
    }
}

impl Weights {
    /// Merge `overrides` over the defaults, then validate the merged set.
    ///
    /// Keys outside the four factors are rejected before anything is merged.
    pub fn from_overrides(overrides: &HashMap<String, f64>) -> Result<Self, WeightsError> {
        let mut unknown: Vec<String> = overrides
            .keys()
            .filter(|key| key.parse::<Factor>().is_err())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(WeightsError::UnknownKeys(unknown));
        }

        let mut weights = Self::default();
        for (key, &value) in overrides {
            if let Ok(factor) = key.parse::<Factor>() {
                weights.set(factor, value);
            }
        }
        weights.validated()
    }

    /// Check the finiteness, sum and sign invariants, returning the weights
    /// unchanged.
    ///
    /// NaN and infinite weights are rejected before the sum is looked at.
    pub fn validated(self) -> Result<Self, WeightsError> {
        for factor in Factor::ALL {
            let value = self.get(factor);
            if !value.is_finite() {
                return Err(WeightsError::NonFinite { factor, value });
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum {
                total,
                weights: self,
            });
        }
        for factor in Factor::ALL {
            let value = self.get(factor);
            if value < 0.0 {
                return Err(WeightsError::Negative { factor, value });
            }
        }
        Ok(self)
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Urgency => self.urgency,
            Factor::Importance => self.importance,
            Factor::Effort => self.effort,
            Factor::Dependencies => self.dependencies,
        }
    }

    fn set(&mut self, factor: Factor, value: f64) {
        match factor {
            Factor::Urgency => self.urgency = value,
            Factor::Importance => self.importance = value,
            Factor::Effort => self.effort = value,
            Factor::Dependencies => self.dependencies = value,
        }
    }

    pub fn total(&self) -> f64 {
        Factor::ALL.into_iter().map(|factor| self.get(factor)).sum()
    }

    /// Scale all weights so they sum to 1.0. A zero total is returned as is.
    pub fn normalized(self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return self;
        }
        Self {
            urgency: self.urgency / total,
            importance: self.importance / total,
            effort: self.effort / total,
            dependencies: self.dependencies / total,
        }
    }

    /// Weights keyed by factor name, for the Python and JSON boundaries.
    pub fn to_map(&self) -> HashMap<String, f64> {
        Factor::ALL
            .into_iter()
            .map(|factor| (factor.as_str().to_string(), self.get(factor)))
            .collect()
    }
}
