//! Tunable parameters for the planners.

use std::fmt;

/// Parameters for [`Planner::astar`](crate::Planner::astar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AstarConfig {
    /// Multiplier `w` in `f = g + w * h`. With the default of 2 the
    /// heuristic may overestimate, so returned paths are not guaranteed
    /// shortest. Use 1 for classic (admissible) A*.
    pub heuristic_weight: i32,
    /// Give up after this many heap pops. `None` searches until the open
    /// set is empty.
    pub max_expansions: Option<usize>,
}

impl Default for AstarConfig {
    fn default() -> Self {
        Self {
            heuristic_weight: 2,
            max_expansions: None,
        }
    }
}

impl AstarConfig {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heuristic_weight < 0 {
            return Err(ConfigError::NegativeWeight(self.heuristic_weight));
        }
        Ok(())
    }
}

/// Parameters for [`Planner::rrt`](crate::Planner::rrt).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RrtConfig {
    /// Number of sampling rounds before giving up. Every round counts,
    /// including ones whose sample or extension is rejected.
    pub max_iterations: usize,
    /// A newly added cell closer than this (Manhattan) to the goal tries
    /// to connect to it.
    pub goal_threshold: i32,
    /// Probability that a round samples the goal instead of a uniform cell.
    pub goal_bias: f64,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            goal_threshold: 1,
            goal_bias: 0.2,
        }
    }
}

impl RrtConfig {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.goal_bias) {
            return Err(ConfigError::GoalBias(self.goal_bias));
        }
        if self.goal_threshold <= 0 {
            return Err(ConfigError::NonPositiveThreshold(self.goal_threshold));
        }
        Ok(())
    }
}

/// Errors reported by the config `validate` methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `goal_bias` outside `[0, 1]` (or NaN).
    GoalBias(f64),
    /// `heuristic_weight` below zero.
    NegativeWeight(i32),
    /// `goal_threshold` of zero or less; no cell could ever connect.
    NonPositiveThreshold(i32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoalBias(p) => write!(f, "goal bias {p} is not a probability"),
            Self::NegativeWeight(w) => write!(f, "heuristic weight {w} is negative"),
            Self::NonPositiveThreshold(t) => {
                write!(f, "goal threshold {t} must be at least 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
