//! Unit tests for e1RM estimation.

use liftlog::progression::e1rm::{
    best_estimate_from_sets, estimate_one_rep_max, E1rmFormula, BRZYCKI_MAX_REPS,
};
use liftlog::PerformedSet;

const FORMULAS: [E1rmFormula; 2] = [E1rmFormula::Epley, E1rmFormula::Brzycki];

#[test]
fn test_zero_reps_never_computable() {
    for formula in FORMULAS {
        for weight in [0.0, 20.0, 100.0, 250.5] {
            assert_eq!(estimate_one_rep_max(weight, 0, formula), None);
        }
    }
}

#[test]
fn test_brzycki_invalid_beyond_36_reps() {
    for reps in 37..=60 {
        assert_eq!(estimate_one_rep_max(100.0, reps, E1rmFormula::Brzycki), None);
    }
}

#[test]
fn test_brzycki_increasing_in_weight() {
    for reps in 1..=BRZYCKI_MAX_REPS {
        let mut previous = 0.0;
        for weight in [20.0, 40.0, 60.0, 100.0, 180.0] {
            let e1rm = estimate_one_rep_max(weight, reps, E1rmFormula::Brzycki).unwrap();
            assert!(e1rm > 0.0);
            assert!(e1rm > previous, "reps={reps} weight={weight}");
            previous = e1rm;
        }
    }
}

#[test]
fn test_epley_exceeds_lifted_weight() {
    for reps in 1..=20 {
        for weight in [2.5, 50.0, 100.0, 200.0] {
            let e1rm = estimate_one_rep_max(weight, reps, E1rmFormula::Epley).unwrap();
            assert!(e1rm > weight);
        }
    }
}

#[test]
fn test_epley_increasing_in_weight_and_reps() {
    let by_reps: Vec<f64> = (1..=15)
        .map(|reps| estimate_one_rep_max(100.0, reps, E1rmFormula::Epley).unwrap())
        .collect();
    assert!(by_reps.windows(2).all(|w| w[1] > w[0]));

    let by_weight: Vec<f64> = [40.0, 60.0, 80.0, 100.0]
        .iter()
        .map(|&weight| estimate_one_rep_max(weight, 5, E1rmFormula::Epley).unwrap())
        .collect();
    assert!(by_weight.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_estimates_are_deterministic() {
    for formula in FORMULAS {
        let first = estimate_one_rep_max(102.5, 7, formula).unwrap();
        let second = estimate_one_rep_max(102.5, 7, formula).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }
}

#[test]
fn test_best_estimate_ignores_warmup_and_incomplete() {
    let sets = vec![
        PerformedSet::warmup(60.0, 10),
        PerformedSet::warmup(80.0, 5),
        PerformedSet::working(140.0, 3).incomplete(),
    ];

    for formula in FORMULAS {
        assert_eq!(best_estimate_from_sets(&sets, formula), None);
    }
}

#[test]
fn test_best_estimate_skips_uncomputable_sets() {
    // 40 reps is outside Brzycki's range; only the triple counts
    let sets = vec![
        PerformedSet::working(40.0, 40),
        PerformedSet::working(120.0, 3),
    ];

    let best = best_estimate_from_sets(&sets, E1rmFormula::Brzycki).unwrap();
    assert_eq!(best, estimate_one_rep_max(120.0, 3, E1rmFormula::Brzycki).unwrap());
}
