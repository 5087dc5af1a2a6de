//! Progression engine: e1RM estimation and next-session advice.

pub mod advisor;
pub mod e1rm;

pub use advisor::{
    classify_trend, percent_change, recommend, round_down_to_step, ProgressionAdvisor,
    ProgressionTrend, Recommendation,
};
pub use e1rm::{best_estimate_from_sets, estimate_one_rep_max, E1rmFormula, E1rmHistory};
