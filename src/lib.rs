/// Implemented RL algorithms
pub mod algo;

/// Run configuration
pub mod config;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Experience tuples
pub mod exp;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Train-then-evaluate entry point
pub mod run;

mod util;

pub use config::LearnerConfig;
pub use error::{Error, Result};
pub use run::{train_and_evaluate, Outcome};
