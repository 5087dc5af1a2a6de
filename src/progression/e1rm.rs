//! Estimated one-rep max (e1RM) calculations.
//!
//! Converts a (weight, reps) performance into a comparable strength
//! estimate. Estimates are only ever produced for strictly positive
//! results; anything not computable is `None`.

use serde::{Deserialize, Serialize};

use crate::workouts::types::{PerformanceSession, PerformedSet};

/// Highest rep count the Brzycki formula accepts.
pub const BRZYCKI_MAX_REPS: u32 = 36;

/// Formula used to extrapolate a one-rep max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum E1rmFormula {
    /// weight * (1 + reps / 30)
    #[default]
    Epley,
    /// weight * 36 / (37 - reps), valid for 1..=36 reps
    Brzycki,
}

impl E1rmFormula {
    /// Get display name for this formula.
    pub fn display_name(&self) -> &'static str {
        match self {
            E1rmFormula::Epley => "Epley",
            E1rmFormula::Brzycki => "Brzycki",
        }
    }
}

impl std::fmt::Display for E1rmFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for E1rmFormula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "epley" => Ok(E1rmFormula::Epley),
            "brzycki" => Ok(E1rmFormula::Brzycki),
            other => Err(format!("unknown e1RM formula: {other}")),
        }
    }
}

/// Estimate a one-rep max from a single performance.
///
/// Returns `None` for zero reps, for Brzycki beyond 36 reps, and for any
/// weight that does not yield a positive finite estimate.
pub fn estimate_one_rep_max(weight: f64, reps: u32, formula: E1rmFormula) -> Option<f64> {
    if reps == 0 || !weight.is_finite() {
        return None;
    }

    let estimate = match formula {
        E1rmFormula::Epley => weight * (1.0 + reps as f64 / 30.0),
        E1rmFormula::Brzycki => {
            if reps > BRZYCKI_MAX_REPS {
                return None;
            }
            weight * (36.0 / (37 - reps) as f64)
        }
    };

    (estimate > 0.0).then_some(estimate)
}

/// Estimate for one logged set, ignoring its working/warm-up status.
pub fn estimate_for_set(set: &PerformedSet, formula: E1rmFormula) -> Option<f64> {
    estimate_one_rep_max(set.weight, set.reps, formula)
}

/// Best estimate over the working sets of a list.
///
/// Warm-up and incomplete sets never contribute.
pub fn best_estimate_from_sets(sets: &[PerformedSet], formula: E1rmFormula) -> Option<f64> {
    sets.iter()
        .filter(|s| s.is_working())
        .filter_map(|s| estimate_for_set(s, formula))
        .reduce(f64::max)
}

/// e1RM progression over an exercise's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct E1rmHistory {
    /// Usable best estimates, oldest first
    pub values: Vec<f64>,
    /// Mean of `values`, 0 when empty
    pub average: f64,
    /// Change from the oldest to the newest value in percent, 0 with fewer
    /// than two values
    pub trend_percent: f64,
}

impl E1rmHistory {
    /// Build from sessions ordered most-recent-first.
    ///
    /// Sessions with no computable estimate are dropped.
    pub fn from_sessions(sessions: &[PerformanceSession], formula: E1rmFormula) -> Self {
        let values: Vec<f64> = sessions
            .iter()
            .rev()
            .filter_map(|s| s.best_e1rm(formula))
            .collect();

        let average = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };

        let trend_percent = match (values.first(), values.last()) {
            (Some(oldest), Some(newest)) if values.len() >= 2 => {
                (newest - oldest) / oldest * 100.0
            }
            _ => 0.0,
        };

        Self {
            values,
            average,
            trend_percent,
        }
    }

    /// Most recent usable estimate.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Highest usable estimate.
    pub fn best(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}
