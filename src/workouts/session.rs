//! Active workout state and its reducer.
//!
//! The state is an immutable snapshot; every event produces a new one via
//! [`reduce`]. Progression advice is never computed inside the reducer.
//! Exercises whose advice must be (re)computed are listed in
//! `pending_advice` and filled in by [`refresh_advice`].

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::history::provider::PerformanceHistory;
use crate::progression::advisor::{ProgressionAdvisor, Recommendation};
use crate::workouts::types::{Exercise, ExerciseId, PerformanceSession, PerformedSet, Workout};

/// Errors surfaced in the active workout state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// No workout has been started
    #[error("No active workout")]
    NoActiveWorkout,

    /// A workout is already in progress
    #[error("A workout is already in progress")]
    AlreadyActive,

    /// The workout has been finished and no longer accepts changes
    #[error("Workout is already finished")]
    WorkoutFinished,

    /// Exercise is not part of the active workout
    #[error("Exercise {0} is not part of this workout")]
    ExerciseNotInWorkout(ExerciseId),

    /// Set index out of range
    #[error("Exercise {exercise_id} has no set #{index}")]
    NoSuchSet { exercise_id: ExerciseId, index: usize },

    /// Advice lookup failed
    #[error("Progression advice unavailable: {0}")]
    AdviceFailed(String),
}

/// Events dispatched by the workout screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveWorkoutEvent {
    Start { started_at: DateTime<Utc> },
    AddExercise { exercise: Exercise },
    RemoveExercise { exercise_id: ExerciseId },
    AddSet { exercise_id: ExerciseId, set: PerformedSet },
    UpdateSet { exercise_id: ExerciseId, index: usize, set: PerformedSet },
    CompleteSet { exercise_id: ExerciseId, index: usize },
    DeleteSet { exercise_id: ExerciseId, index: usize },
    AdviceLoaded { exercise_id: ExerciseId, recommendation: Recommendation },
    AdviceFailed { exercise_id: ExerciseId, message: String },
    Finish { finished_at: DateTime<Utc>, note: Option<String> },
    Discard,
}

/// Snapshot of the active workout screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveWorkoutState {
    /// Workout being logged
    pub workout: Option<Workout>,
    /// Exercises in the workout, by id
    pub exercises: HashMap<ExerciseId, Exercise>,
    /// Latest advice per exercise
    pub advice: HashMap<ExerciseId, Recommendation>,
    /// Exercises whose advice must be recomputed
    pub pending_advice: BTreeSet<ExerciseId>,
    /// Last error, cleared by the next successful event
    pub error: Option<SessionError>,
}

impl ActiveWorkoutState {
    /// Session of an exercise in the active workout.
    pub fn session(&self, exercise_id: &ExerciseId) -> Option<&PerformanceSession> {
        self.workout
            .as_ref()?
            .exercises
            .iter()
            .find(|s| &s.exercise_id == exercise_id)
    }

    fn with_error(&self, error: SessionError) -> Self {
        Self {
            error: Some(error),
            ..self.clone()
        }
    }
}

/// Apply one event to a state snapshot.
pub fn reduce(state: &ActiveWorkoutState, event: ActiveWorkoutEvent) -> ActiveWorkoutState {
    match event {
        ActiveWorkoutEvent::Start { started_at } => {
            if state.workout.is_some() {
                return state.with_error(SessionError::AlreadyActive);
            }
            ActiveWorkoutState {
                workout: Some(Workout::start(started_at)),
                ..ActiveWorkoutState::default()
            }
        }
        ActiveWorkoutEvent::AddExercise { exercise } => {
            let mut next = state.clone();
            let workout = match open_workout(&mut next) {
                Ok(workout) => workout,
                Err(err) => return state.with_error(err),
            };
            if !workout.exercises.iter().any(|s| s.exercise_id == exercise.id) {
                workout
                    .exercises
                    .push(PerformanceSession::new(exercise.id, Vec::new()));
            }
            next.pending_advice.insert(exercise.id);
            next.exercises.insert(exercise.id, exercise);
            next.error = None;
            next
        }
        ActiveWorkoutEvent::RemoveExercise { exercise_id } => {
            update_session(state, &exercise_id, |_| Ok(())).map_or_else(
                |err| state.with_error(err),
                |mut next| {
                    if let Some(workout) = next.workout.as_mut() {
                        workout.exercises.retain(|s| s.exercise_id != exercise_id);
                    }
                    next.exercises.remove(&exercise_id);
                    next.advice.remove(&exercise_id);
                    next.pending_advice.remove(&exercise_id);
                    next
                },
            )
        }
        ActiveWorkoutEvent::AddSet { exercise_id, set } => {
            apply(state, &exercise_id, |session| {
                session.sets.push(set);
                Ok(())
            })
        }
        ActiveWorkoutEvent::UpdateSet {
            exercise_id,
            index,
            set,
        } => apply(state, &exercise_id, |session| {
            *set_at(session, exercise_id, index)? = set;
            Ok(())
        }),
        ActiveWorkoutEvent::CompleteSet { exercise_id, index } => {
            apply(state, &exercise_id, |session| {
                set_at(session, exercise_id, index)?.completed = true;
                Ok(())
            })
        }
        ActiveWorkoutEvent::DeleteSet { exercise_id, index } => {
            apply(state, &exercise_id, |session| {
                set_at(session, exercise_id, index)?;
                session.sets.remove(index);
                Ok(())
            })
        }
        ActiveWorkoutEvent::AdviceLoaded {
            exercise_id,
            recommendation,
        } => {
            let mut next = state.clone();
            next.pending_advice.remove(&exercise_id);
            // Late advice for a removed exercise is dropped
            if next.exercises.contains_key(&exercise_id) {
                next.advice.insert(exercise_id, recommendation);
            }
            next
        }
        ActiveWorkoutEvent::AdviceFailed {
            exercise_id,
            message,
        } => {
            let mut next = state.with_error(SessionError::AdviceFailed(message));
            next.pending_advice.remove(&exercise_id);
            next
        }
        ActiveWorkoutEvent::Finish { finished_at, note } => {
            let mut next = state.clone();
            let workout = match open_workout(&mut next) {
                Ok(workout) => workout,
                Err(err) => return state.with_error(err),
            };
            workout.finished_at = Some(finished_at);
            workout.note = note;
            // The finished workout is now part of every exercise's history
            next.pending_advice = next.exercises.keys().copied().collect();
            next.error = None;
            next
        }
        ActiveWorkoutEvent::Discard => ActiveWorkoutState::default(),
    }
}

fn set_at(
    session: &mut PerformanceSession,
    exercise_id: ExerciseId,
    index: usize,
) -> Result<&mut PerformedSet, SessionError> {
    session
        .sets
        .get_mut(index)
        .ok_or(SessionError::NoSuchSet { exercise_id, index })
}

fn open_workout(state: &mut ActiveWorkoutState) -> Result<&mut Workout, SessionError> {
    let workout = state.workout.as_mut().ok_or(SessionError::NoActiveWorkout)?;
    if workout.is_completed() {
        return Err(SessionError::WorkoutFinished);
    }
    Ok(workout)
}

fn update_session<F>(
    state: &ActiveWorkoutState,
    exercise_id: &ExerciseId,
    change: F,
) -> Result<ActiveWorkoutState, SessionError>
where
    F: FnOnce(&mut PerformanceSession) -> Result<(), SessionError>,
{
    let mut next = state.clone();
    let workout = open_workout(&mut next)?;
    let session = workout
        .exercises
        .iter_mut()
        .find(|s| &s.exercise_id == exercise_id)
        .ok_or(SessionError::ExerciseNotInWorkout(*exercise_id))?;

    change(session)?;
    next.error = None;
    Ok(next)
}

fn apply<F>(state: &ActiveWorkoutState, exercise_id: &ExerciseId, change: F) -> ActiveWorkoutState
where
    F: FnOnce(&mut PerformanceSession) -> Result<(), SessionError>,
{
    update_session(state, exercise_id, change).unwrap_or_else(|err| state.with_error(err))
}

/// Compute advice for every pending exercise and fold the results into
/// the state.
pub fn refresh_advice<H: PerformanceHistory>(
    state: &ActiveWorkoutState,
    advisor: &ProgressionAdvisor<H>,
) -> ActiveWorkoutState {
    state
        .pending_advice
        .iter()
        .fold(state.clone(), |current, exercise_id| {
            let Some(exercise) = current.exercises.get(exercise_id) else {
                return current;
            };

            let event = match advisor.advise_for(exercise) {
                Ok(recommendation) => ActiveWorkoutEvent::AdviceLoaded {
                    exercise_id: *exercise_id,
                    recommendation,
                },
                Err(err) => {
                    tracing::warn!("Advice for {} failed: {err}", exercise.name);
                    ActiveWorkoutEvent::AdviceFailed {
                        exercise_id: *exercise_id,
                        message: err.to_string(),
                    }
                }
            };

            reduce(&current, event)
        })
}
