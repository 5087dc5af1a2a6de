//! Workout logging: sets, exercise sessions and the active workout state.

pub mod session;
pub mod types;

pub use session::{reduce, refresh_advice, ActiveWorkoutEvent, ActiveWorkoutState, SessionError};
pub use types::{
    Exercise, ExerciseCategory, ExerciseId, PerformanceSession, PerformedSet, Workout,
};
