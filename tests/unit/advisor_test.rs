//! Unit tests for progression advice.

use chrono::{Duration, TimeZone, Utc};
use liftlog::history::provider::{HistoryError, InMemoryHistory, PerformanceHistory};
use liftlog::progression::advisor::{recommend, ProgressionAdvisor, ProgressionTrend};
use liftlog::storage::config::Units;
use liftlog::workouts::types::ExerciseId;
use liftlog::{E1rmFormula, Exercise, ExerciseCategory, PerformanceSession, PerformedSet, Workout};

/// Build a history for one exercise from set lists ordered most recent first.
fn history_of(exercise: &Exercise, sessions: Vec<Vec<PerformedSet>>) -> InMemoryHistory {
    let newest = Utc.with_ymd_and_hms(2025, 6, 30, 17, 0, 0).unwrap();

    let workouts = sessions
        .into_iter()
        .enumerate()
        .map(|(age, sets)| {
            let start = newest - Duration::days(3 * age as i64);
            let mut workout = Workout::start(start);
            workout.finished_at = Some(start + Duration::minutes(50));
            workout
                .exercises
                .push(PerformanceSession::new(exercise.id, sets));
            workout
        })
        .collect();

    InMemoryHistory::from_parts(vec![exercise.clone()], workouts)
}

fn squat() -> Exercise {
    Exercise::new("Squat", ExerciseCategory::Compound)
}

#[test]
fn test_no_history_starts_light() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(&exercise, vec![]));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::FirstTime);
    assert_eq!(advice.reps, 8);
    assert_eq!(advice.weight, 0.0);
}

#[test]
fn test_single_usable_session_repeats_it() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![vec![PerformedSet::working(100.0, 5)]],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::FirstTime);
    assert_eq!(advice.weight, 100.0);
    assert_eq!(advice.reps, 5);
}

#[test]
fn test_progressing_adds_step() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(110.0, 5).with_rpe(7)],
            vec![PerformedSet::working(100.0, 5).with_rpe(7)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::Progressing);
    assert_eq!(advice.weight, 112.5);
    assert_eq!(advice.reps, 5);
    assert!(advice.message.contains("112.5 kg"));
}

#[test]
fn test_high_rpe_holds_weight() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(110.0, 5).with_rpe(9)],
            vec![PerformedSet::working(100.0, 5)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::Plateau);
    assert_eq!(advice.measured_trend, ProgressionTrend::Progressing);
    assert_eq!(advice.weight, 110.0);
    assert_eq!(advice.reps, 5);
    assert!(advice.message.contains("RPE"));
}

#[test]
fn test_missing_rpe_counts_as_moderate() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(110.0, 5)],
            vec![PerformedSet::working(100.0, 5)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();
    assert_eq!(advice.trend, ProgressionTrend::Progressing);
}

#[test]
fn test_regressing_deloads_to_step() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(100.0, 5)],
            vec![PerformedSet::working(115.0, 5)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::Regressing);
    assert_eq!(advice.weight, 90.0);
    assert_eq!(advice.reps, 5);
    assert!(advice.message.contains("10%"));
}

#[test]
fn test_regressing_truncates_rather_than_rounds() {
    let exercise = squat();
    // 0.9 * 97.5 = 87.75 -> 87.5 with a 2.5 step
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(97.5, 5)],
            vec![PerformedSet::working(120.0, 5)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();
    assert_eq!(advice.weight, 87.5);
}

#[test]
fn test_unusable_latest_session_still_drives_first_time() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::warmup(60.0, 10)],
            vec![PerformedSet::working(100.0, 5)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::FirstTime);
    assert_eq!(advice.weight, 60.0);
    assert_eq!(advice.reps, 10);
}

#[test]
fn test_targets_come_from_latest_usable_session() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(120.0, 5).incomplete()],
            vec![PerformedSet::working(110.0, 5)],
            vec![PerformedSet::working(100.0, 5)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Epley)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::Progressing);
    assert_eq!(advice.weight, 112.5);
}

#[test]
fn test_trend_window_ignores_older_sessions() {
    let exercise = squat();
    // Three flat sessions, then a much lighter one that is outside the window
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(100.0, 5)],
            vec![PerformedSet::working(100.0, 5)],
            vec![PerformedSet::working(100.0, 5)],
            vec![PerformedSet::working(50.0, 5)],
        ],
    ));

    let advice = advisor
        .progression_advice(&exercise.id, 2.5, E1rmFormula::Brzycki)
        .unwrap();

    assert_eq!(advice.trend, ProgressionTrend::Plateau);
    assert_eq!(advice.reps, 6);
}

#[test]
fn test_advise_for_uses_category_step() {
    let curl = Exercise::new("Barbell Curl", ExerciseCategory::Isolation);
    let advisor = ProgressionAdvisor::new(history_of(
        &curl,
        vec![
            vec![PerformedSet::working(35.0, 10)],
            vec![PerformedSet::working(30.0, 10)],
        ],
    ));

    let advice = advisor.advise_for(&curl).unwrap();
    assert_eq!(advice.weight, 36.25);
}

#[test]
fn test_last_performance_and_summary() {
    let exercise = squat();
    let advisor = ProgressionAdvisor::new(history_of(
        &exercise,
        vec![
            vec![PerformedSet::working(105.0, 1)],
            vec![PerformedSet::working(100.0, 1)],
        ],
    ));

    let last = advisor.last_performance(&exercise.id).unwrap().unwrap();
    assert_eq!(last.sets[0].weight, 105.0);

    let summary = advisor.e1rm_history(&exercise.id, 10).unwrap();
    assert_eq!(summary.values.len(), 2);
    assert!(summary.trend_percent > 0.0);

    assert!(advisor.last_performance(&ExerciseId::nil()).unwrap().is_none());
}

#[test]
fn test_repeated_calls_are_identical() {
    let sessions = vec![
        PerformanceSession::new(ExerciseId::nil(), vec![PerformedSet::working(100.0, 5)]),
        PerformanceSession::new(ExerciseId::nil(), vec![PerformedSet::working(115.0, 5)]),
    ];

    let first = recommend(&sessions, 2.5, E1rmFormula::Epley, Units::Metric);
    let second = recommend(&sessions, 2.5, E1rmFormula::Epley, Units::Metric);
    assert_eq!(first, second);
    assert_eq!(first.weight.to_bits(), second.weight.to_bits());
}

struct OfflineHistory;

impl PerformanceHistory for OfflineHistory {
    fn recent_performances(
        &self,
        _exercise_id: &ExerciseId,
        _limit: usize,
    ) -> Result<Vec<PerformanceSession>, HistoryError> {
        Err(HistoryError::Unavailable("database locked".into()))
    }
}

#[test]
fn test_history_errors_propagate() {
    let advisor = ProgressionAdvisor::new(OfflineHistory);
    let result = advisor.progression_advice(&ExerciseId::nil(), 2.5, E1rmFormula::Epley);
    assert!(matches!(result, Err(HistoryError::Unavailable(_))));
}
