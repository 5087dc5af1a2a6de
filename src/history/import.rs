//! JSON training-log loader.
//!
//! A training log names exercises once and refers to them by name from
//! each workout:
//!
//! ```json
//! {
//!   "exercises": [{ "name": "Squat", "category": "compound" }],
//!   "workouts": [{
//!     "started_at": "2025-04-01T18:00:00Z",
//!     "finished_at": "2025-04-01T19:00:00Z",
//!     "exercises": [{
//!       "exercise": "Squat",
//!       "sets": [{ "weight": 100.0, "reps": 5, "rpe": 8, "completed": true }]
//!     }]
//!   }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provider::{HistoryError, InMemoryHistory};
use crate::workouts::types::{
    Exercise, ExerciseCategory, PerformanceSession, PerformedSet, Workout,
};

/// Exercise entry of a training log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedExercise {
    pub name: String,
    pub category: ExerciseCategory,
}

/// One exercise's sets within a logged workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedSession {
    /// Exercise name, matched case-insensitively
    pub exercise: String,
    #[serde(default)]
    pub sets: Vec<PerformedSet>,
}

/// Workout entry of a training log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedWorkout {
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub exercises: Vec<LoggedSession>,
}

/// A complete training log as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingLog {
    #[serde(default)]
    pub exercises: Vec<LoggedExercise>,
    #[serde(default)]
    pub workouts: Vec<LoggedWorkout>,
}

impl TrainingLog {
    /// Parse a training log from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HistoryError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a training log file.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HistoryError::Io(format!("{}: {e}", path.display())))?;
        let log = Self::from_json(&content)?;

        tracing::info!(
            "Loaded training log {} ({} exercises, {} workouts)",
            path.display(),
            log.exercises.len(),
            log.workouts.len()
        );

        Ok(log)
    }

    /// Write the training log as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HistoryError::Io(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| HistoryError::Io(e.to_string()))
    }

    /// Resolve exercise names and build an in-memory history.
    ///
    /// Sessions naming an unknown exercise are skipped with a warning.
    pub fn into_history(self) -> InMemoryHistory {
        let exercises: Vec<Exercise> = self
            .exercises
            .into_iter()
            .map(|e| Exercise::new(e.name, e.category))
            .collect();

        let ids: HashMap<String, Uuid> = exercises
            .iter()
            .map(|e| (Exercise::name_key(&e.name), e.id))
            .collect();

        let workouts = self
            .workouts
            .into_iter()
            .map(|logged| {
                let mut workout = Workout::start(logged.started_at);
                workout.finished_at = logged.finished_at;
                workout.note = logged.note;
                workout.exercises = logged
                    .exercises
                    .into_iter()
                    .filter_map(|session| {
                        let Some(id) = ids.get(&Exercise::name_key(&session.exercise)) else {
                            tracing::warn!(
                                "Skipping sets for unknown exercise '{}' in workout started {}",
                                session.exercise,
                                logged.started_at
                            );
                            return None;
                        };
                        Some(PerformanceSession::new(*id, session.sets))
                    })
                    .collect();
                workout
            })
            .collect();

        InMemoryHistory::from_parts(exercises, workouts)
    }
}
