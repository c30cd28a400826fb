//! Training loop for the gridworld Q-learning agent
//!
//! The loop orchestrates episodes: it asks the agent for an action, applies
//! it to the environment, feeds the resulting transition back to the agent,
//! and advances until the goal is reached. It only forwards values between
//! the two components; it never touches their internals.

use serde::{Deserialize, Serialize};

use crate::{
    agent::QLearningAgent,
    error::Result,
    grid::{GridWorld, Transition},
    observers::Observer,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Random seed; when set, the run is exactly reproducible
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Steps-to-goal for each episode, in order
    pub steps_per_episode: Vec<usize>,

    /// Mean steps-to-goal over the whole run
    pub average_steps: f64,

    /// Fewest steps in any episode
    pub best_steps: usize,

    /// Most steps in any episode
    pub worst_steps: usize,
}

impl TrainingResult {
    pub fn new(steps_per_episode: Vec<usize>) -> Self {
        let total_episodes = steps_per_episode.len();
        let average_steps = if total_episodes > 0 {
            steps_per_episode.iter().sum::<usize>() as f64 / total_episodes as f64
        } else {
            0.0
        };
        let best_steps = steps_per_episode.iter().copied().min().unwrap_or(0);
        let worst_steps = steps_per_episode.iter().copied().max().unwrap_or(0);

        Self {
            total_episodes,
            steps_per_episode,
            average_steps,
            best_steps,
            worst_steps,
        }
    }

    /// Average steps-to-goal over consecutive blocks of episodes
    ///
    /// A trailing partial block is averaged over its own length. Useful for
    /// convergence checks: a learning agent shows non-increasing block
    /// averages over time, within noise.
    pub fn block_averages(&self, block_size: usize) -> Vec<f64> {
        assert!(block_size > 0, "block size must be a positive integer");
        self.steps_per_episode
            .chunks(block_size)
            .map(|block| block.iter().sum::<usize>() as f64 / block.len() as f64)
            .collect()
    }
}

/// Episode-driven training loop
///
/// Per episode the loop is a three-state machine: START (environment
/// reset), RUNNING (choose, step, learn, advance), DONE (goal reached).
pub struct TrainingLoop {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingLoop {
    /// Create a new training loop
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured number of episodes
    ///
    /// When a seed is configured, the environment and agent RNGs are derived
    /// from it so repeated runs produce identical trajectories.
    pub fn run(
        &mut self,
        env: &mut GridWorld,
        agent: &mut QLearningAgent,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            env.set_rng_seed(seed);
            agent.set_rng_seed(seed.wrapping_add(1));
        }

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut steps_per_episode = Vec::with_capacity(self.config.episodes);
        for episode in 0..self.config.episodes {
            let steps = Self::run_episode(env, agent);
            steps_per_episode.push(steps);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, steps)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(steps_per_episode))
    }

    fn run_episode(env: &mut GridWorld, agent: &mut QLearningAgent) -> usize {
        let mut state = env.reset();
        let mut steps = 0;

        loop {
            let action = agent.choose_action(state);
            let (next_state, reward, done) = env.step(action);
            agent.learn(&Transition {
                state,
                action,
                reward,
                next_state,
                done,
            });
            state = next_state;
            steps += 1;
            if done {
                return steps;
            }
        }
    }
}
