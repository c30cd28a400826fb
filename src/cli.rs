//! Train command - run Q-learning on a grid world and report the result

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    agent::QLearningAgent,
    grid::{GridWorld, Position},
    observers::{EpisodeLogObserver, ProgressObserver},
    trainer::{TrainingConfig, TrainingLoop, TrainingResult},
};

#[derive(Parser, Debug)]
#[command(
    name = "gridworld",
    version,
    about = "Train a tabular Q-learning agent to navigate a grid world"
)]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Grid side length
    #[arg(long, short = 's', default_value_t = 5)]
    pub size: usize,

    /// Goal position as `row,col` (defaults to the bottom-right corner)
    #[arg(long)]
    pub goal: Option<String>,

    /// Learning rate alpha (0.0-1.0]
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f64,

    /// Discount factor gamma [0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Exploration rate epsilon [0.0-1.0]
    #[arg(long, default_value_t = 0.2)]
    pub epsilon: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Suppress per-episode output
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SummaryStats {
    total_episodes: usize,
    average_steps: f64,
    best_steps: usize,
    worst_steps: usize,
    first_episode_steps: Option<usize>,
    last_episode_steps: Option<usize>,
}

impl From<&TrainingResult> for SummaryStats {
    fn from(result: &TrainingResult) -> Self {
        Self {
            total_episodes: result.total_episodes,
            average_steps: result.average_steps,
            best_steps: result.best_steps,
            worst_steps: result.worst_steps,
            first_episode_steps: result.steps_per_episode.first().copied(),
            last_episode_steps: result.steps_per_episode.last().copied(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    size: usize,
    goal: (usize, usize),
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: SummaryStats,
    metadata: SummaryMetadata,
}

/// Parse a goal position from `row,col`
fn parse_goal(value: &str, size: usize) -> Result<Position> {
    let (row_str, col_str) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("Invalid goal '{value}'. Expected format: row,col"))?;

    let row = row_str
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("Invalid goal row '{}'", row_str.trim()))?;
    let col = col_str
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("Invalid goal column '{}'", col_str.trim()))?;

    if row >= size || col >= size {
        return Err(anyhow!(
            "Goal ({row}, {col}) is outside the {size}x{size} grid"
        ));
    }

    Ok(Position::new(row, col))
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let goal = match args.goal {
        Some(ref raw) => parse_goal(raw, args.size)?,
        None => Position::new(
            args.size.saturating_sub(1),
            args.size.saturating_sub(1),
        ),
    };

    let mut env = GridWorld::new(args.size, goal)?;
    let mut agent = QLearningAgent::new(args.size, args.alpha, args.gamma, args.epsilon)?;

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let config = TrainingConfig {
        episodes: args.episodes,
        seed: args.seed,
    };

    let mut training = TrainingLoop::new(config);
    if !args.quiet {
        training = training.with_observer(Box::new(EpisodeLogObserver));
    }
    if args.progress {
        training = training.with_observer(Box::new(ProgressObserver::new()));
    }

    let result = training.run(&mut env, &mut agent)?;

    println!("\n=== Training Complete ===");
    println!("Episodes: {}", result.total_episodes);
    println!("Average steps to goal: {:.1}", result.average_steps);
    println!("Best episode: {} steps", result.best_steps);
    println!("Worst episode: {} steps", result.worst_steps);

    println!("\nLearned Q-table:");
    println!("{}", agent.q_table());
    println!("Greedy policy (G marks the goal):");
    println!("{}", agent.q_table().greedy_policy_grid(goal));

    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!("Normalizing summary path to {}", summary_path.display());
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: SummaryStats::from(&result),
            metadata: SummaryMetadata {
                size: args.size,
                goal: (goal.row, goal.col),
                alpha: args.alpha,
                gamma: args.gamma,
                epsilon: args.epsilon,
                seed: args.seed,
            },
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}
