//! Next-session progression advice.
//!
//! Classifies the recent e1RM trend of an exercise and turns it into a
//! concrete weight/rep target:
//! - Progressing: add one progression step
//! - Plateau: hold the weight, add a rep
//! - Regressing: deload by 10%, rounded down to the step
//! - First time: repeat the last result, or start light

use serde::{Deserialize, Serialize};

use super::e1rm::{E1rmFormula, E1rmHistory};
use crate::history::provider::{HistoryError, PerformanceHistory};
use crate::storage::config::{ProgressionSettings, Units};
use crate::workouts::types::{Exercise, ExerciseId, PerformanceSession, PerformedSet};

/// Sessions fetched for trend analysis.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;
/// Sessions fetched for the e1RM history summary.
pub const SUMMARY_HISTORY_LIMIT: usize = 10;
/// Usable e1RM values considered by the trend.
pub const TREND_WINDOW: usize = 3;
/// Percent change at or above which the trend is progressing.
pub const PROGRESSING_THRESHOLD_PERCENT: f64 = 2.5;
/// Percent change at or below which the trend is regressing.
pub const REGRESSING_THRESHOLD_PERCENT: f64 = -5.0;
/// Last-set RPE at which load is not increased.
pub const HIGH_RPE: u8 = 9;
/// RPE assumed when the last working set has none.
pub const DEFAULT_RPE: u8 = 7;
/// Rep target with no usable history.
pub const DEFAULT_REPS: u32 = 8;
/// Weight multiplier applied when regressing.
pub const DELOAD_FACTOR: f64 = 0.9;

/// Classification of recent performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionTrend {
    /// Trending up, load can be added
    Progressing,
    /// Stable, consolidate
    Plateau,
    /// Declining, deload
    Regressing,
    /// Not enough usable history
    FirstTime,
}

impl ProgressionTrend {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            ProgressionTrend::Progressing => "Progressing",
            ProgressionTrend::Plateau => "Plateau",
            ProgressionTrend::Regressing => "Regressing",
            ProgressionTrend::FirstTime => "First time",
        }
    }
}

impl std::fmt::Display for ProgressionTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Target for the next session of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended load, 0 with no usable history
    pub weight: f64,
    /// Recommended rep target
    pub reps: u32,
    /// Trend shown to the user. A high-RPE progression is reported as
    /// `Plateau`.
    pub trend: ProgressionTrend,
    /// Trend as classified from the e1RM values alone
    pub measured_trend: ProgressionTrend,
    /// Message for direct display
    pub message: String,
}

/// Working-set summary of the most recent usable session.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LastPerformance {
    weight: f64,
    reps: u32,
    rpe: u8,
}

impl LastPerformance {
    fn from_session(session: &PerformanceSession) -> Self {
        let working: Vec<&PerformedSet> = session.working_sets().collect();

        Self {
            weight: working.iter().map(|s| s.weight).fold(0.0, f64::max),
            reps: working
                .iter()
                .map(|s| s.reps)
                .max()
                .unwrap_or(DEFAULT_REPS),
            rpe: working.last().and_then(|s| s.rpe).unwrap_or(DEFAULT_RPE),
        }
    }
}

/// Percent change of the recent average against the oldest value in the
/// trend window.
///
/// `values` are usable e1RMs, most recent first. Returns `None` with fewer
/// than two values or a non-positive oldest value.
pub fn percent_change(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let recent = &values[..values.len().min(TREND_WINDOW)];
    let avg_recent = recent.iter().sum::<f64>() / recent.len() as f64;
    let oldest = *recent.last()?;

    if oldest <= 0.0 {
        return None;
    }

    Some((avg_recent - oldest) / oldest * 100.0)
}

/// Classify usable e1RM values (most recent first) into a trend.
pub fn classify_trend(values: &[f64]) -> ProgressionTrend {
    match percent_change(values) {
        None => ProgressionTrend::FirstTime,
        Some(change) if change >= PROGRESSING_THRESHOLD_PERCENT => ProgressionTrend::Progressing,
        Some(change) if change <= REGRESSING_THRESHOLD_PERCENT => ProgressionTrend::Regressing,
        Some(_) => ProgressionTrend::Plateau,
    }
}

/// Truncate `value` down to a multiple of `step`.
///
/// A non-positive step leaves the value unchanged.
pub fn round_down_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 || !step.is_finite() {
        return value;
    }
    (value / step).trunc() * step
}

/// Whether sessions with timestamps are ordered most recent first.
///
/// Sessions without a timestamp are not checked.
pub fn is_most_recent_first(sessions: &[PerformanceSession]) -> bool {
    let stamps: Vec<_> = sessions.iter().filter_map(|s| s.performed_at).collect();
    stamps.windows(2).all(|pair| pair[0] >= pair[1])
}

/// Format a weight without trailing zeros.
pub fn format_weight(weight: f64) -> String {
    let text = format!("{weight:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Derive a recommendation from an exercise's recent sessions.
///
/// `sessions` must be ordered most recent first.
pub fn recommend(
    sessions: &[PerformanceSession],
    step: f64,
    formula: E1rmFormula,
    units: Units,
) -> Recommendation {
    debug_assert!(
        is_most_recent_first(sessions),
        "performance history must be ordered most recent first"
    );

    let Some(latest) = sessions.first() else {
        return first_time_advice(None, units);
    };

    let e1rm_values: Vec<f64> = sessions.iter().filter_map(|s| s.best_e1rm(formula)).collect();
    let measured = classify_trend(&e1rm_values);
    let change = percent_change(&e1rm_values);

    tracing::debug!(
        sessions = sessions.len(),
        usable = e1rm_values.len(),
        change = ?change,
        trend = %measured,
        "classified progression trend"
    );

    // Present whenever the trend is not FirstTime
    let Some(last_usable) = sessions.iter().find(|s| s.best_e1rm(formula).is_some()) else {
        return first_time_advice(Some(latest), units);
    };
    let last = LastPerformance::from_session(last_usable);
    let unit = units.weight_symbol();

    match measured {
        ProgressionTrend::FirstTime => first_time_advice(Some(latest), units),
        ProgressionTrend::Progressing if last.rpe >= HIGH_RPE => Recommendation {
            weight: last.weight,
            reps: last.reps,
            trend: ProgressionTrend::Plateau,
            measured_trend: measured,
            message: format!(
                "RPE {} was too high to add load. Consolidate at {} {unit}.",
                last.rpe,
                format_weight(last.weight)
            ),
        },
        ProgressionTrend::Progressing => {
            let target = last.weight + step;
            Recommendation {
                weight: target,
                reps: last.reps,
                trend: ProgressionTrend::Progressing,
                measured_trend: measured,
                message: format!(
                    "Progress! +{} {unit} → {} {unit}",
                    format_weight(step),
                    format_weight(target)
                ),
            }
        }
        ProgressionTrend::Plateau => Recommendation {
            weight: last.weight,
            reps: last.reps.saturating_add(1),
            trend: ProgressionTrend::Plateau,
            measured_trend: measured,
            message: format!(
                "Plateau. Try one more rep at {} {unit} or take a deload.",
                format_weight(last.weight)
            ),
        },
        ProgressionTrend::Regressing => {
            let target = round_down_to_step(last.weight * DELOAD_FACTOR, step);
            Recommendation {
                weight: target,
                reps: last.reps,
                trend: ProgressionTrend::Regressing,
                measured_trend: measured,
                message: format!(
                    "Regression. Reduce the weight by 10% to {} {unit}.",
                    format_weight(target)
                ),
            }
        }
    }
}

fn first_time_advice(latest: Option<&PerformanceSession>, units: Units) -> Recommendation {
    let Some(session) = latest else {
        return Recommendation {
            weight: 0.0,
            reps: DEFAULT_REPS,
            trend: ProgressionTrend::FirstTime,
            measured_trend: ProgressionTrend::FirstTime,
            message: "First time performing this exercise. Start with a comfortable weight."
                .to_string(),
        };
    };

    let first = session.sets.first();
    let weight = first.map(|s| s.weight).unwrap_or(0.0);
    let reps = first
        .map(|s| s.reps)
        .filter(|&reps| reps > 0)
        .unwrap_or(DEFAULT_REPS);

    Recommendation {
        weight,
        reps,
        trend: ProgressionTrend::FirstTime,
        measured_trend: ProgressionTrend::FirstTime,
        message: format!(
            "Repeat your previous result: {} {} x {reps}.",
            format_weight(weight),
            units.weight_symbol()
        ),
    }
}

/// Progression advisor over a history provider.
pub struct ProgressionAdvisor<H> {
    history: H,
    settings: ProgressionSettings,
}

impl<H: PerformanceHistory> ProgressionAdvisor<H> {
    /// Create an advisor with default settings.
    pub fn new(history: H) -> Self {
        Self::with_settings(history, ProgressionSettings::default())
    }

    /// Create an advisor with explicit settings.
    pub fn with_settings(history: H, settings: ProgressionSettings) -> Self {
        Self { history, settings }
    }

    /// Settings in use.
    pub fn settings(&self) -> &ProgressionSettings {
        &self.settings
    }

    /// Underlying history provider.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Advice for an exercise with an explicit step and formula.
    pub fn progression_advice(
        &self,
        exercise_id: &ExerciseId,
        step: f64,
        formula: E1rmFormula,
    ) -> Result<Recommendation, HistoryError> {
        let sessions = self
            .history
            .recent_performances(exercise_id, self.settings.history_limit)?;

        Ok(recommend(&sessions, step, formula, self.settings.units))
    }

    /// Advice using the configured formula and the exercise category's step.
    pub fn advise_for(&self, exercise: &Exercise) -> Result<Recommendation, HistoryError> {
        let step = self.settings.steps.step_for(exercise.category);
        self.progression_advice(&exercise.id, step, self.settings.formula)
    }

    /// e1RM history summary over the last `limit` sessions.
    pub fn e1rm_history(
        &self,
        exercise_id: &ExerciseId,
        limit: usize,
    ) -> Result<E1rmHistory, HistoryError> {
        let sessions = self.history.recent_performances(exercise_id, limit)?;
        Ok(E1rmHistory::from_sessions(&sessions, self.settings.formula))
    }

    /// Most recent session of an exercise, if any.
    pub fn last_performance(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<Option<PerformanceSession>, HistoryError> {
        Ok(self
            .history
            .recent_performances(exercise_id, 1)?
            .into_iter()
            .next())
    }
}
