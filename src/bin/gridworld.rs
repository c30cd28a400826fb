//! Gridworld CLI - train a tabular Q-learning agent and print the learned
//! value table

use anyhow::Result;
use clap::Parser;

use gridworld::cli::{TrainArgs, execute};

fn main() -> Result<()> {
    let args = TrainArgs::parse();
    execute(args)
}
