//! Read access to an exercise's performance history.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::workouts::types::{Exercise, ExerciseId, PerformanceSession, Workout};

/// Errors raised while reading training history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Training log could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Training log is malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// No exercise matches the given name or id
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    /// Backing store cannot serve the request
    #[error("History unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Parse(err.to_string())
    }
}

/// Source of recent performance sessions.
pub trait PerformanceHistory {
    /// Sessions of `exercise_id` from completed workouts, most recent
    /// first, at most `limit` of them.
    fn recent_performances(
        &self,
        exercise_id: &ExerciseId,
        limit: usize,
    ) -> Result<Vec<PerformanceSession>, HistoryError>;
}

impl<T: PerformanceHistory + ?Sized> PerformanceHistory for &T {
    fn recent_performances(
        &self,
        exercise_id: &ExerciseId,
        limit: usize,
    ) -> Result<Vec<PerformanceSession>, HistoryError> {
        (**self).recent_performances(exercise_id, limit)
    }
}

impl<T: PerformanceHistory + ?Sized> PerformanceHistory for Arc<T> {
    fn recent_performances(
        &self,
        exercise_id: &ExerciseId,
        limit: usize,
    ) -> Result<Vec<PerformanceSession>, HistoryError> {
        (**self).recent_performances(exercise_id, limit)
    }
}

/// History held in memory, built from logged workouts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    exercises: HashMap<ExerciseId, Exercise>,
    /// Completed workouts, most recent first
    workouts: Vec<Workout>,
}

impl InMemoryHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an exercise list and workouts in any order.
    pub fn from_parts(exercises: Vec<Exercise>, workouts: Vec<Workout>) -> Self {
        let mut history = Self {
            exercises: exercises.into_iter().map(|e| (e.id, e)).collect(),
            workouts: Vec::new(),
        };
        for workout in workouts {
            history.record_workout(workout);
        }
        history
    }

    /// Register an exercise.
    pub fn add_exercise(&mut self, exercise: Exercise) {
        self.exercises.insert(exercise.id, exercise);
    }

    /// Record a workout. Unfinished workouts are ignored.
    pub fn record_workout(&mut self, workout: Workout) {
        if !workout.is_completed() {
            tracing::debug!(workout_id = %workout.id, "skipping unfinished workout");
            return;
        }

        let position = self
            .workouts
            .partition_point(|w| w.started_at >= workout.started_at);
        self.workouts.insert(position, workout);
    }

    /// Look up an exercise by id.
    pub fn exercise(&self, id: &ExerciseId) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    /// Look up an exercise by case-insensitive name.
    pub fn find_exercise(&self, name: &str) -> Result<&Exercise, HistoryError> {
        let key = Exercise::name_key(name);
        self.exercises
            .values()
            .find(|e| Exercise::name_key(&e.name) == key)
            .ok_or_else(|| HistoryError::UnknownExercise(name.to_string()))
    }

    /// All registered exercises, sorted by name.
    pub fn exercises(&self) -> Vec<&Exercise> {
        let mut list: Vec<&Exercise> = self.exercises.values().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Completed workouts, most recent first.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }
}

impl PerformanceHistory for InMemoryHistory {
    fn recent_performances(
        &self,
        exercise_id: &ExerciseId,
        limit: usize,
    ) -> Result<Vec<PerformanceSession>, HistoryError> {
        Ok(self
            .workouts
            .iter()
            .filter_map(|w| w.session_for(exercise_id))
            .take(limit)
            .collect())
    }
}
