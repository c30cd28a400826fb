//! Dense Q-table for temporal difference learning

use std::fmt;

use crate::{
    error::{Error, Result},
    grid::{Action, Position},
};

/// Q-table mapping `(row, col, action)` to a value estimate
///
/// Stored as a flat `size x size x 4` array of `f64`, zero-initialized.
/// The shape is fixed at construction; the learning update is the only
/// mutator. Indexing is by composite key, not an associative map, so
/// lookups are constant-time.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    size: usize,
    values: Vec<f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new zero-initialized Q-table for a `size x size` grid
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `size >= 1`,
    /// `learning_rate` is in `(0, 1]` and `discount_factor` is in `[0, 1)`.
    pub fn new(size: usize, learning_rate: f64, discount_factor: f64) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfiguration {
                message: "Q-table requires a grid size of at least 1".to_string(),
            });
        }
        if !learning_rate.is_finite() || learning_rate <= 0.0 || learning_rate > 1.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate must be in (0, 1], got {learning_rate}"),
            });
        }
        if !discount_factor.is_finite() || !(0.0..1.0).contains(&discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!("discount factor must be in [0, 1), got {discount_factor}"),
            });
        }

        Ok(Self {
            size,
            values: vec![0.0; size * size * Action::COUNT],
            learning_rate,
            discount_factor,
        })
    }

    /// Side length of the grid this table covers
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of entries (`size * size * 4`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    fn offset(&self, state: Position, action: Action) -> usize {
        assert!(
            state.row < self.size && state.col < self.size,
            "state {state} is outside the {0}x{0} grid",
            self.size
        );
        (state.row * self.size + state.col) * Action::COUNT + action.index()
    }

    /// Get the value estimate for a state-action pair
    pub fn get(&self, state: Position, action: Action) -> f64 {
        self.values[self.offset(state, action)]
    }

    fn set(&mut self, state: Position, action: Action, value: f64) {
        let offset = self.offset(state, action);
        self.values[offset] = value;
    }

    /// Maximum value estimate over all actions in a state
    pub fn max_q(&self, state: Position) -> f64 {
        Action::ALL
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for a state
    ///
    /// Ties break toward the first maximal action in [`Action::ALL`]
    /// enumeration order, so greedy selection is deterministic for a given
    /// table.
    pub fn greedy_action(&self, state: Position) -> Action {
        let mut best = Action::ALL[0];
        let mut best_q = self.get(state, best);
        for &action in &Action::ALL[1..] {
            let q = self.get(state, action);
            if q > best_q {
                best = action;
                best_q = q;
            }
        }
        best
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
        done: bool,
    ) {
        let current_q = self.get(state, action);
        let max_next_q = if done { 0.0 } else { self.max_q(next_state) };
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
    }

    /// Render the greedy policy as an arrow grid, with `G` marking the goal
    pub fn greedy_policy_grid(&self, goal: Position) -> String {
        let mut out = String::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Position::new(row, col);
                if pos == goal {
                    out.push('G');
                } else {
                    out.push(self.greedy_action(pos).arrow());
                }
                if col + 1 < self.size {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for QTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "state")?;
        for action in Action::ALL {
            write!(f, " {action:>8}")?;
        }
        writeln!(f)?;

        for row in 0..self.size {
            for col in 0..self.size {
                let state = Position::new(row, col);
                write!(f, "{:>8}", format!("({row}, {col})"))?;
                for action in Action::ALL {
                    write!(f, " {:>8.4}", self.get(state, action))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
