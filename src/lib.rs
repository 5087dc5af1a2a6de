//! LiftLog - Strength Training Progression
//!
//! Tracks logged strength sets, estimates one-rep maxes (e1RM) with the
//! Epley or Brzycki formula, and recommends the next session's weight and
//! rep target from the recent e1RM trend.

pub mod history;
pub mod progression;
pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use history::{HistoryError, InMemoryHistory, PerformanceHistory, TrainingLog};
pub use progression::{E1rmFormula, ProgressionAdvisor, ProgressionTrend, Recommendation};
pub use storage::config::{AppConfig, ProgressionSettings};
pub use workouts::{Exercise, ExerciseCategory, PerformanceSession, PerformedSet, Workout};
