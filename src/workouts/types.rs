//! Strength-training log types.
//!
//! Sets, per-exercise sessions, exercises and whole workouts as the
//! logging workflow records them. The progression engine only ever reads
//! these values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progression::e1rm::{best_estimate_from_sets, E1rmFormula};

/// Identifier of an exercise in the library.
pub type ExerciseId = Uuid;

/// Movement classification, which decides the default load increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    /// Multi-joint barbell lifts (squat, bench, deadlift)
    Compound,
    /// Supporting multi-joint movements
    Accessory,
    /// Single-joint movements
    Isolation,
}

impl ExerciseCategory {
    /// All categories, in display order.
    pub const ALL: [ExerciseCategory; 3] = [
        ExerciseCategory::Compound,
        ExerciseCategory::Accessory,
        ExerciseCategory::Isolation,
    ];

    /// Default progression step in the user's weight unit.
    pub fn default_step(&self) -> f64 {
        match self {
            ExerciseCategory::Compound => 2.5,
            ExerciseCategory::Accessory => 1.25,
            ExerciseCategory::Isolation => 1.25,
        }
    }

    /// Get display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseCategory::Compound => "Compound",
            ExerciseCategory::Accessory => "Accessory",
            ExerciseCategory::Isolation => "Isolation",
        }
    }
}

impl std::fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// An exercise from the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: ExerciseId,
    /// Display name
    pub name: String,
    /// Movement classification
    pub category: ExerciseCategory,
}

impl Exercise {
    /// Create a new exercise with a fresh identifier.
    pub fn new(name: impl Into<String>, category: ExerciseCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
        }
    }

    /// Lookup key for the exercise name: trimmed and lowercased.
    pub fn name_key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

/// One logged set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformedSet {
    /// Load lifted, unit-agnostic
    pub weight: f64,
    /// Repetitions performed
    pub reps: u32,
    /// Rate of perceived exertion (1-10), if recorded
    #[serde(default)]
    pub rpe: Option<u8>,
    /// Whether the set was finished
    #[serde(default)]
    pub completed: bool,
    /// Whether the set was a warm-up
    #[serde(default)]
    pub warmup: bool,
}

impl PerformedSet {
    /// A completed working set without an RPE rating.
    pub fn working(weight: f64, reps: u32) -> Self {
        Self {
            weight,
            reps,
            rpe: None,
            completed: true,
            warmup: false,
        }
    }

    /// A completed warm-up set.
    pub fn warmup(weight: f64, reps: u32) -> Self {
        Self {
            warmup: true,
            ..Self::working(weight, reps)
        }
    }

    /// Attach an RPE rating.
    pub fn with_rpe(mut self, rpe: u8) -> Self {
        self.rpe = Some(rpe);
        self
    }

    /// Mark the set as not (yet) completed.
    pub fn incomplete(mut self) -> Self {
        self.completed = false;
        self
    }

    /// Completed and not a warm-up. Only working sets count toward volume
    /// and e1RM.
    pub fn is_working(&self) -> bool {
        self.completed && !self.warmup
    }

    /// Weight times reps.
    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

/// One exercise's sets within one workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSession {
    /// Exercise performed
    pub exercise_id: ExerciseId,
    /// When the parent workout started, if known
    #[serde(default)]
    pub performed_at: Option<DateTime<Utc>>,
    /// Sets in the order they were logged
    #[serde(default)]
    pub sets: Vec<PerformedSet>,
}

impl PerformanceSession {
    /// Create a session for the given exercise.
    pub fn new(exercise_id: ExerciseId, sets: Vec<PerformedSet>) -> Self {
        Self {
            exercise_id,
            performed_at: None,
            sets,
        }
    }

    /// Set the workout start time.
    pub fn at(mut self, performed_at: DateTime<Utc>) -> Self {
        self.performed_at = Some(performed_at);
        self
    }

    /// Working sets in logged order.
    pub fn working_sets(&self) -> impl Iterator<Item = &PerformedSet> + '_ {
        self.sets.iter().filter(|s| s.is_working())
    }

    /// Number of completed sets, warm-ups included.
    pub fn completed_sets_count(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }

    /// Total volume over working sets.
    pub fn total_volume(&self) -> f64 {
        self.working_sets().map(PerformedSet::volume).sum()
    }

    /// Best e1RM over working sets, `None` if nothing is computable.
    pub fn best_e1rm(&self, formula: E1rmFormula) -> Option<f64> {
        best_estimate_from_sets(&self.sets, formula)
    }
}

/// A logged workout, grouping one session per exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// Finish timestamp, absent while the workout is active
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Exercise sessions in workout order
    #[serde(default)]
    pub exercises: Vec<PerformanceSession>,
    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,
}

impl Workout {
    /// Start a new empty workout.
    pub fn start(started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            finished_at: None,
            exercises: Vec::new(),
            note: None,
        }
    }

    /// Whether the workout has been finished.
    pub fn is_completed(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Duration in whole minutes, 0 while unfinished.
    pub fn duration_minutes(&self) -> i64 {
        self.finished_at
            .map(|end| (end - self.started_at).num_minutes())
            .unwrap_or(0)
    }

    /// Number of completed sets across all exercises.
    pub fn total_sets(&self) -> usize {
        self.exercises
            .iter()
            .map(PerformanceSession::completed_sets_count)
            .sum()
    }

    /// Working-set volume across all exercises.
    pub fn total_volume(&self) -> f64 {
        self.exercises
            .iter()
            .map(PerformanceSession::total_volume)
            .sum()
    }

    /// This workout's session for an exercise, with the workout start time
    /// attached.
    pub fn session_for(&self, exercise_id: &ExerciseId) -> Option<PerformanceSession> {
        self.exercises
            .iter()
            .find(|s| &s.exercise_id == exercise_id)
            .map(|s| PerformanceSession {
                performed_at: Some(self.started_at),
                ..s.clone()
            })
    }
}
