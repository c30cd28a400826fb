//! Epsilon-greedy Q-learning agent
//!
//! The agent owns the Q-table and the exploration policy. It selects
//! actions with an ε-greedy rule and updates value estimates from observed
//! transitions with the off-policy TD control update. Hyperparameters are
//! fixed at construction; there is no ε or α decay.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    error::{Error, Result},
    grid::{Action, Position, Transition, build_rng},
    q_table::QTable,
};

/// Q-learning agent (off-policy TD control)
///
/// Learns the optimal Q* function by always updating toward the maximum
/// next-state value, regardless of the action actually taken.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent for a `size x size` grid
    ///
    /// # Arguments
    ///
    /// * `size` - Grid side length; fixes the Q-table shape
    /// * `alpha` - Learning rate, in `(0, 1]`
    /// * `gamma` - Discount factor, in `[0, 1)`
    /// * `epsilon` - Exploration rate, in `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range
    /// hyperparameters.
    pub fn new(size: usize, alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("exploration rate must be in [0, 1], got {epsilon}"),
            });
        }

        Ok(Self {
            q_table: QTable::new(size, alpha, gamma)?,
            epsilon,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The learned value table
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// ε-greedy action selection
    ///
    /// With probability ε, a uniformly random action (exploration);
    /// otherwise the greedy action, with ties broken deterministically by
    /// [`QTable::greedy_action`]. At ε = 0 this is a pure function of the
    /// table contents and the state.
    pub fn choose_action(&mut self, state: Position) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            *Action::ALL.choose(&mut self.rng).unwrap()
        } else {
            // Exploit: greedy action based on Q-values
            self.q_table.greedy_action(state)
        }
    }

    /// Update the value table from one observed transition
    ///
    /// This is the sole mutator of the Q-table.
    pub fn learn(&mut self, transition: &Transition) {
        self.q_table.q_learning_update(
            transition.state,
            transition.action,
            transition.reward,
            transition.next_state,
            transition.done,
        );
    }
}
