//! Deterministic grid-world environment
//!
//! The environment owns the agent's position and the goal cell. Episodes
//! start at a uniformly random non-goal cell and end when a step lands on
//! the goal, which pays a reward of 1. All other steps pay 0.

use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A cell on the grid, `(row, col)` with both coordinates in `[0, size-1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The fixed 4-neighborhood action set
///
/// Enumeration order is significant: greedy action selection breaks ties
/// in favor of the first maximal action in [`Action::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in canonical enumeration order
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Number of actions
    pub const COUNT: usize = Self::ALL.len();

    /// Stable index of this action in [`Action::ALL`]
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Convert a table index back into an action
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidActionIndex`] if `index` is not in `0..4`.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidActionIndex { index })
    }

    /// Single-character arrow used when rendering a policy grid
    pub fn arrow(self) -> char {
        match self {
            Action::Up => '^',
            Action::Down => 'v',
            Action::Left => '<',
            Action::Right => '>',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f.pad so width specifiers work in table headers
        f.pad(match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        })
    }
}

/// One environment step observed by the agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: Position,
    pub action: Action,
    pub reward: f64,
    pub next_state: Position,
    pub done: bool,
}

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Deterministic square grid world
///
/// Dynamics: an action moves the agent one cell in the chosen direction,
/// clamped to the grid. Moving against a boundary is a no-op on that axis,
/// not an error.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: usize,
    goal: Position,
    agent_pos: Position,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl GridWorld {
    /// Create a new grid world
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `size <= 1` (a non-goal
    /// start cell would be unreachable) or if `goal` lies outside the grid.
    pub fn new(size: usize, goal: Position) -> Result<Self> {
        if size <= 1 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid size must be at least 2, got {size}"),
            });
        }
        if goal.row >= size || goal.col >= size {
            return Err(Error::InvalidConfiguration {
                message: format!("goal {goal} is outside the {size}x{size} grid"),
            });
        }

        // Placeholder start until the first reset; never the goal.
        let start = if goal == Position::new(0, 0) {
            Position::new(0, 1)
        } else {
            Position::new(0, 0)
        };

        Ok(Self {
            size,
            goal,
            agent_pos: start,
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

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Current agent position
    pub fn position(&self) -> Position {
        self.agent_pos
    }

    /// Start a new episode at a uniformly random non-goal cell
    ///
    /// Samples cells until one differs from the goal; the domain is finite
    /// and contains at least one non-goal cell, so this terminates.
    pub fn reset(&mut self) -> Position {
        loop {
            let candidate = Position::new(
                self.rng.random_range(0..self.size),
                self.rng.random_range(0..self.size),
            );
            if candidate != self.goal {
                self.agent_pos = candidate;
                return candidate;
            }
        }
    }

    /// Apply an action and observe `(next_state, reward, done)`
    ///
    /// Mutates the environment's current position. Reward is 1.0 exactly
    /// when the resulting position is the goal, else 0.0; `done` is true
    /// iff the goal was reached.
    pub fn step(&mut self, action: Action) -> (Position, f64, bool) {
        let Position { row, col } = self.agent_pos;
        let next = match action {
            Action::Up => Position::new(row.saturating_sub(1), col),
            Action::Down => Position::new((row + 1).min(self.size - 1), col),
            Action::Left => Position::new(row, col.saturating_sub(1)),
            Action::Right => Position::new(row, (col + 1).min(self.size - 1)),
        };

        self.agent_pos = next;
        let done = next == self.goal;
        let reward = if done { 1.0 } else { 0.0 };
        (next, reward, done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_by_five() -> GridWorld {
        GridWorld::new(5, Position::new(4, 4)).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_size() {
        assert!(matches!(
            GridWorld::new(1, Position::new(0, 0)),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            GridWorld::new(0, Position::new(0, 0)),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_bounds_goal() {
        assert!(matches!(
            GridWorld::new(5, Position::new(5, 0)),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            GridWorld::new(5, Position::new(2, 7)),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_clamping_at_origin() {
        let mut env = five_by_five();
        env.agent_pos = Position::new(0, 0);
        let (next, _, _) = env.step(Action::Up);
        assert_eq!(next, Position::new(0, 0));

        env.agent_pos = Position::new(0, 0);
        let (next, _, _) = env.step(Action::Left);
        assert_eq!(next, Position::new(0, 0));
    }

    #[test]
    fn test_clamping_at_far_edge() {
        let mut env = five_by_five();
        env.agent_pos = Position::new(4, 0);
        let (next, _, _) = env.step(Action::Down);
        assert_eq!(next, Position::new(4, 0));
    }

    #[test]
    fn test_terminal_transition() {
        let mut env = five_by_five();
        env.agent_pos = Position::new(3, 4);
        let (next, reward, done) = env.step(Action::Down);
        assert_eq!(next, Position::new(4, 4));
        assert_eq!(reward, 1.0);
        assert!(done);
    }

    #[test]
    fn test_non_terminal_transition() {
        let mut env = five_by_five();
        env.agent_pos = Position::new(0, 0);
        let (next, reward, done) = env.step(Action::Right);
        assert_eq!(next, Position::new(0, 1));
        assert_eq!(reward, 0.0);
        assert!(!done);
    }

    #[test]
    fn test_step_stays_in_bounds_everywhere() {
        let mut env = five_by_five();
        for row in 0..5 {
            for col in 0..5 {
                for action in Action::ALL {
                    env.agent_pos = Position::new(row, col);
                    let (next, _, _) = env.step(action);
                    assert!(next.row < 5 && next.col < 5, "{next} escaped the grid");
                }
            }
        }
    }

    #[test]
    fn test_reset_never_returns_goal() {
        let mut env = five_by_five().with_seed(7);
        for _ in 0..1000 {
            let start = env.reset();
            assert_ne!(start, env.goal());
            assert!(start.row < 5 && start.col < 5);
        }
    }

    #[test]
    fn test_reset_is_reproducible_with_seed() {
        let mut a = five_by_five().with_seed(42);
        let mut b = five_by_five().with_seed(42);
        for _ in 0..20 {
            assert_eq!(a.reset(), b.reset());
        }
    }

    #[test]
    fn test_action_index_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()).unwrap(), action);
        }
        assert!(matches!(
            Action::from_index(4),
            Err(Error::InvalidActionIndex { index: 4 })
        ));
    }

    #[test]
    fn test_start_placeholder_avoids_goal_at_origin() {
        let env = GridWorld::new(3, Position::new(0, 0)).unwrap();
        assert_ne!(env.position(), env.goal());
    }
}
