//! Tunables for a full train-then-evaluate run.

use crate::{
    algo::tabular::QTableAgentConfig,
    decay::{self, Schedule},
    ensure_interval,
    error::{Error, Result},
    exploration::EpsilonGreedy,
    gym::{Action, CorridorConfig},
};

/// How ε moves away from its starting value as episodes go by
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EpsilonDecay {
    /// ε(t) = end + (ε - end) * e<sup>-rate * t</sup>
    Exponential { rate: f32, end: f32 },
    /// ε(t) = max(ε - rate * t, end)
    Linear { rate: f32, end: f32 },
}

/// Configuration for [`train_and_evaluate`](crate::run::train_and_evaluate)
///
/// Defaults reproduce the classic setup: a five cell corridor, ten episodes,
/// and the `Right, Left, Right` target pattern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LearnerConfig {
    /// Size of the one-dimensional state space
    pub num_positions: usize,
    /// Number of training episodes
    pub episode_count: u32,
    /// Temporal-difference step size α
    pub learning_rate: f32,
    /// Future reward discount factor γ
    pub discount: f32,
    /// Exploration probability ε at the first episode
    pub epsilon: f32,
    /// Schedule for ε over episodes, `None` keeps it constant
    pub epsilon_decay: Option<EpsilonDecay>,
    /// Action sequence that ends an episode and yields the reward
    pub target_pattern: Vec<Action>,
    /// Cap on the greedy evaluation rollout
    pub eval_max_steps: usize,
    /// Per-episode step ceiling during training, `None` for unbounded episodes
    pub max_episode_steps: Option<u32>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        let corridor = CorridorConfig::default();
        Self {
            num_positions: corridor.num_positions,
            episode_count: 10,
            learning_rate: 0.8,
            discount: 0.9,
            epsilon: 0.3,
            epsilon_decay: None,
            target_pattern: corridor.target_pattern,
            eval_max_steps: 10,
            max_episode_steps: Some(1000),
        }
    }
}

impl LearnerConfig {
    pub fn validate(&self) -> Result<()> {
        let &Self {
            num_positions,
            learning_rate,
            discount,
            epsilon,
            ..
        } = self;
        if num_positions == 0 {
            return Err(Error::EmptyStateSpace);
        }
        if self.target_pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }
        ensure_interval!(learning_rate, 0.0, 1.0);
        ensure_interval!(discount, 0.0, 1.0);
        ensure_interval!(epsilon, 0.0, 1.0);
        if self.max_episode_steps == Some(0) {
            return Err(Error::ZeroStepCeiling);
        }
        self.schedule()?;
        Ok(())
    }

    /// Exploration schedule starting at `epsilon`
    pub fn schedule(&self) -> Result<Schedule> {
        let epsilon = self.epsilon;
        let schedule = match self.epsilon_decay {
            None => Schedule::Constant(decay::Constant::new(epsilon)),
            Some(EpsilonDecay::Exponential {
                rate,
                end: epsilon_end,
            }) => {
                ensure_interval!(epsilon_end, 0.0, 1.0);
                Schedule::Exponential(decay::Exponential::new(rate, epsilon, epsilon_end)?)
            }
            Some(EpsilonDecay::Linear {
                rate,
                end: epsilon_end,
            }) => {
                ensure_interval!(epsilon_end, 0.0, 1.0);
                Schedule::Linear(decay::Linear::new(rate, epsilon, epsilon_end)?)
            }
        };
        Ok(schedule)
    }

    pub fn corridor(&self) -> CorridorConfig {
        CorridorConfig {
            num_positions: self.num_positions,
            target_pattern: self.target_pattern.clone(),
        }
    }

    pub fn agent(&self) -> Result<QTableAgentConfig<Schedule>> {
        Ok(QTableAgentConfig {
            exploration: EpsilonGreedy::new(self.schedule()?),
            alpha: self.learning_rate,
            gamma: self.discount,
            max_episode_steps: self.max_episode_steps,
        })
    }
}
