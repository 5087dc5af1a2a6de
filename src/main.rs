//! LiftLog - Strength Training Progression
//!
//! Command-line entry point: e1RM estimates and next-session advice from a
//! JSON training log.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use liftlog::progression::advisor::{format_weight, SUMMARY_HISTORY_LIMIT};
use liftlog::progression::e1rm::estimate_one_rep_max;
use liftlog::storage::config::{load_config, load_config_from, AppConfig};
use liftlog::{E1rmFormula, ProgressionAdvisor, TrainingLog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for liftlog
#[derive(Parser, Debug)]
#[command(name = "liftlog")]
#[command(about = "Strength-training progression advice")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to the platform data directory)
    #[arg(short, long, global = true, env = "LIFTLOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate a one-rep max from a single set
    E1rm {
        /// Weight lifted
        #[arg(short, long)]
        weight: f64,
        /// Repetitions performed
        #[arg(short, long)]
        reps: u32,
        /// Formula (epley or brzycki), overrides the config
        #[arg(short, long)]
        formula: Option<E1rmFormula>,
    },
    /// Recommend the next session for an exercise
    Advise {
        /// JSON training log
        #[arg(short, long, env = "LIFTLOG_LOG")]
        log: PathBuf,
        /// Exercise name
        #[arg(short, long)]
        exercise: String,
        /// Formula (epley or brzycki), overrides the config
        #[arg(short, long)]
        formula: Option<E1rmFormula>,
    },
    /// Show the e1RM history of an exercise
    History {
        /// JSON training log
        #[arg(short, long, env = "LIFTLOG_LOG")]
        log: PathBuf,
        /// Exercise name
        #[arg(short, long)]
        exercise: String,
        /// Number of most recent sessions to include
        #[arg(short = 'n', long, default_value_t = SUMMARY_HISTORY_LIMIT)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    tracing::info!("Starting LiftLog v{}", env!("CARGO_PKG_VERSION"));

    let mut config: AppConfig = match &args.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => load_config().context("Failed to load config")?,
    };
    let unit = config.progression.units.weight_symbol();

    match args.command {
        Command::E1rm {
            weight,
            reps,
            formula,
        } => {
            let formula = formula.unwrap_or(config.progression.formula);
            match estimate_one_rep_max(weight, reps, formula) {
                Some(e1rm) => println!(
                    "{} {unit} x {reps} -> e1RM {} {unit} ({formula})",
                    format_weight(weight),
                    format_weight(e1rm)
                ),
                None => println!(
                    "e1RM not computable for {} x {reps} ({formula})",
                    format_weight(weight)
                ),
            }
        }
        Command::Advise {
            log,
            exercise,
            formula,
        } => {
            if let Some(formula) = formula {
                config.progression.formula = formula;
            }
            let history = TrainingLog::load(&log)
                .with_context(|| format!("Failed to read training log {}", log.display()))?
                .into_history();
            let exercise = history.find_exercise(&exercise)?.clone();
            let advisor = ProgressionAdvisor::with_settings(history, config.progression);

            let advice = advisor.advise_for(&exercise)?;
            println!("{} ({})", exercise.name, exercise.category);
            println!("  Trend:  {}", advice.trend);
            println!("  Target: {} {unit} x {}", format_weight(advice.weight), advice.reps);
            println!("  {}", advice.message);
        }
        Command::History {
            log,
            exercise,
            limit,
        } => {
            let history = TrainingLog::load(&log)
                .with_context(|| format!("Failed to read training log {}", log.display()))?
                .into_history();
            let exercise = history.find_exercise(&exercise)?.clone();
            let advisor = ProgressionAdvisor::with_settings(history, config.progression);

            let summary = advisor.e1rm_history(&exercise.id, limit)?;
            println!("{} e1RM ({})", exercise.name, advisor.settings().formula);
            for value in &summary.values {
                println!("  {} {unit}", format_weight(*value));
            }
            if summary.values.is_empty() {
                println!("  no completed working sets");
            } else {
                println!("  Average: {} {unit}", format_weight(summary.average));
                println!("  Trend:   {:+.1}%", summary.trend_percent);
            }
        }
    }

    Ok(())
}
