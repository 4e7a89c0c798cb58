use thiserror::Error;

/// Errors raised by the learner and its configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A state index fell outside the table
    #[error("state {state} is outside the state space [0, {num_states})")]
    InvalidState { state: usize, num_states: usize },

    #[error("the state space must contain at least one state")]
    EmptyStateSpace,

    #[error("the target pattern must contain at least one action")]
    EmptyPattern,

    #[error("invalid value for `{name}`: {value} is not in the interval [{low}, {high}]")]
    OutOfInterval {
        name: &'static str,
        value: f32,
        low: f32,
        high: f32,
    },

    #[error("the per-episode step ceiling must allow at least one step")]
    ZeroStepCeiling,

    #[error("`vi - vf` must have the same sign as `rate`")]
    InvalidDecay,
}

pub type Result<T> = std::result::Result<T, Error>;
