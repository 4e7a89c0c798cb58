use strum::{Display, VariantArray};

use crate::{
    algo::tabular::DiscreteAction,
    env::Environment,
    error::{Error, Result},
};

/// Reward for completing the target pattern
pub const PATTERN_REWARD: f32 = 10.0;

/// Reward for every step that does not complete the pattern
pub const STEP_REWARD: f32 = -1.0;

#[derive(VariantArray, Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Left = 0,
    Right = 1,
}

impl DiscreteAction for Action {
    fn index(self) -> usize {
        self as usize
    }
}

/// Configuration for the [`Corridor`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorridorConfig {
    /// Number of cells, positions are `0..num_positions`
    pub num_positions: usize,
    /// Trailing action sequence that ends an episode with a reward
    pub target_pattern: Vec<Action>,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            num_positions: 5,
            target_pattern: vec![Action::Right, Action::Left, Action::Right],
        }
    }
}

/// Next position after moving one cell, clamped to the corridor walls
pub fn transition(state: usize, action: Action, num_positions: usize) -> usize {
    match action {
        Action::Left => state.saturating_sub(1),
        Action::Right => (state + 1).min(num_positions.saturating_sub(1)),
    }
}

/// Score the trailing actions of an episode
///
/// The reward only looks at the action history, never at the position reached.
///
/// **Returns** `(reward, terminated)`
pub fn pattern_reward(history: &[Action], pattern: &[Action]) -> (f32, bool) {
    if !pattern.is_empty() && history.ends_with(pattern) {
        (PATTERN_REWARD, true)
    } else {
        (STEP_REWARD, false)
    }
}

/// A one-dimensional track where the agent must learn to play a fixed
/// sequence of moves, starting from the left wall
///
/// Intended for use with a [QTableAgent](crate::algo::tabular::QTableAgent)
#[derive(Debug, Clone)]
pub struct Corridor {
    num_positions: usize,
    pattern: Vec<Action>,
    pos: usize,
    history: Vec<Action>,
}

impl Corridor {
    pub fn new(config: CorridorConfig) -> Result<Self> {
        if config.num_positions == 0 {
            return Err(Error::EmptyStateSpace);
        }
        if config.target_pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }
        Ok(Self {
            num_positions: config.num_positions,
            pattern: config.target_pattern,
            pos: 0,
            history: Vec::new(),
        })
    }

    pub fn num_positions(&self) -> usize {
        self.num_positions
    }

    pub fn pattern(&self) -> &[Action] {
        &self.pattern
    }

    /// Actions taken so far in the current episode
    pub fn history(&self) -> &[Action] {
        &self.history
    }
}

impl Environment for Corridor {
    type State = usize;
    type Action = Action;

    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool) {
        self.pos = transition(self.pos, action, self.num_positions);
        self.history.push(action);
        let (reward, terminated) = pattern_reward(&self.history, &self.pattern);
        (self.pos, reward, terminated)
    }

    fn reset(&mut self) -> Self::State {
        self.pos = 0;
        self.history.clear();
        self.pos
    }
}
