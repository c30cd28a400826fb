//! Tabular Q-learning on a deterministic grid world
//!
//! This crate provides:
//! - A deterministic grid-world environment with reset/step dynamics
//! - A dense Q-table and an ε-greedy Q-learning agent
//! - An episode-driven training loop with composable progress observers
//! - A CLI for running training and inspecting the learned policy

pub mod agent;
pub mod cli;
pub mod error;
pub mod grid;
pub mod observers;
pub mod q_table;
pub mod trainer;

pub use agent::QLearningAgent;
pub use error::{Error, Result};
pub use grid::{Action, GridWorld, Position, Transition};
pub use observers::{EpisodeLogObserver, Observer, ProgressObserver};
pub use q_table::QTable;
pub use trainer::{TrainingConfig, TrainingLoop, TrainingResult};
