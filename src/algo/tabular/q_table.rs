use std::{fmt, marker::PhantomData};

use log::{debug, info, warn};
use rand::{seq::SliceRandom, Rng};

use crate::{
    decay::{self, Decay},
    ensure_interval,
    env::Environment,
    error::{Error, Result},
    exp::Exp,
    exploration::{Choice, EpsilonGreedy},
};

use super::{DiscreteAction, Rollout, RolloutStep};

/// A dense table of action values, one row per state and one column per action
///
/// All values start at `0.0` and the table is never resized after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable<A> {
    values: Vec<f32>,
    num_states: usize,
    _action: PhantomData<A>,
}

impl<A: DiscreteAction> QTable<A> {
    /// Create a zero-filled table for `num_states` states and every variant of `A`
    pub fn new(num_states: usize) -> Result<Self> {
        if num_states == 0 {
            return Err(Error::EmptyStateSpace);
        }
        Ok(Self {
            values: vec![0.0; num_states * A::VARIANTS.len()],
            num_states,
            _action: PhantomData,
        })
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        A::VARIANTS.len()
    }

    fn offset(&self, state: usize) -> Result<usize> {
        if state >= self.num_states {
            return Err(Error::InvalidState {
                state,
                num_states: self.num_states,
            });
        }
        Ok(state * self.num_actions())
    }

    /// Values of every action in `state`, in variant order
    pub fn row(&self, state: usize) -> Result<&[f32]> {
        let start = self.offset(state)?;
        Ok(&self.values[start..start + self.num_actions()])
    }

    pub fn get(&self, state: usize, action: A) -> Result<f32> {
        Ok(self.values[self.offset(state)? + action.index()])
    }

    pub fn set(&mut self, state: usize, action: A, value: f32) -> Result<()> {
        let ix = self.offset(state)? + action.index();
        self.values[ix] = value;
        Ok(())
    }

    /// Largest action value in `state`
    pub fn max_value(&self, state: usize) -> Result<f32> {
        Ok(self
            .row(state)?
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max))
    }

    /// Greedy action in `state`; ties go to the earliest variant
    pub fn best_action(&self, state: usize) -> Result<A> {
        let row = self.row(state)?;
        let best = A::VARIANTS
            .iter()
            .zip(row)
            .fold(None, |best: Option<(A, f32)>, (&a, &q)| match best {
                Some((_, v)) if v >= q => best,
                _ => Some((a, q)),
            })
            .map(|(a, _)| a)
            .expect("There is always at least one action available");
        Ok(best)
    }

    /// Temporal-difference update of a single entry
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
    pub fn update(
        &mut self,
        state: usize,
        action: A,
        reward: f32,
        next_state: usize,
        alpha: f32,
        gamma: f32,
    ) -> Result<()> {
        let max_next_q = self.max_value(next_state)?;
        let ix = self.offset(state)? + action.index();
        let q_value = self.values[ix];
        self.values[ix] = q_value + alpha * (reward + gamma * max_next_q - q_value);
        Ok(())
    }
}

impl<A: DiscreteAction + fmt::Display> fmt::Display for QTable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}", "state")?;
        for action in A::VARIANTS {
            write!(f, " {:>10}", action.to_string())?;
        }
        for (state, row) in self.values.chunks(self.num_actions()).enumerate() {
            write!(f, "\n{state:>5}")?;
            for value in row {
                write!(f, " {value:>10.4}")?;
            }
        }
        Ok(())
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay> {
    pub exploration: EpsilonGreedy<D>,
    pub alpha: f32,
    pub gamma: f32,
    /// Episodes that have not terminated after this many steps are cut short.
    /// `None` lets an episode run until the environment terminates it.
    pub max_episode_steps: Option<u32>,
}

impl Default for QTableAgentConfig<decay::Constant> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.3)),
            alpha: 0.8,
            gamma: 0.9,
            max_episode_steps: Some(1000),
        }
    }
}

/// Summary of one training episode
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Episode {
    pub index: u32,
    pub steps: u32,
    pub reward: f32,
    /// `false` when the step ceiling ended the episode before the environment did
    pub terminated: bool,
}

/// A Q-learning agent backed by a dense [`QTable`]
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - States must be indices into the table, and actions must be [`DiscreteAction`]s
/// - `D` - The [`Decay`] schedule of the exploration threshold
pub struct QTableAgent<E, D = decay::Constant>
where
    E: Environment<State = usize>,
    E::Action: DiscreteAction,
    D: Decay,
{
    q_table: QTable<E::Action>,
    exploration: EpsilonGreedy<D>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    max_episode_steps: Option<u32>,
    episode: u32, // current episode
}

impl<E, D> QTableAgent<E, D>
where
    E: Environment<State = usize>,
    E::Action: DiscreteAction,
    D: Decay,
{
    /// Initialize a new `QTableAgent` with a zeroed table of `num_states` rows
    ///
    /// Fails if `alpha` or `gamma` is not in the interval `[0,1]`, if the
    /// state space is empty, or if the step ceiling allows no steps
    pub fn new(num_states: usize, config: QTableAgentConfig<D>) -> Result<Self> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
            max_episode_steps,
        } = config;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        if max_episode_steps == Some(0) {
            return Err(Error::ZeroStepCeiling);
        }
        Ok(Self {
            q_table: QTable::new(num_states)?,
            exploration,
            alpha,
            gamma,
            max_episode_steps,
            episode: 0,
        })
    }

    pub fn q_table(&self) -> &QTable<E::Action> {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable<E::Action> {
        self.q_table
    }

    /// Number of episodes played so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    fn act<R: Rng + ?Sized>(&self, state: usize, rng: &mut R) -> Result<E::Action> {
        match self.exploration.choose(self.episode, rng) {
            Choice::Explore => Ok(*<E::Action as strum::VariantArray>::VARIANTS
                .choose(rng)
                .expect("There is always at least one action available")),
            Choice::Exploit => self.q_table.best_action(state),
        }
    }

    fn learn(&mut self, experience: Exp<E>) -> Result<()> {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;

        self.q_table
            .update(state, action, reward, next_state, self.alpha, self.gamma)
    }

    /// Play one training episode, updating the table after every step
    pub fn go<R: Rng + ?Sized>(&mut self, env: &mut E, rng: &mut R) -> Result<Episode> {
        let mut state = env.reset();
        let mut steps = 0;
        let mut total_reward = 0.0;

        let terminated = loop {
            if self.max_episode_steps.is_some_and(|cap| steps >= cap) {
                break false;
            }

            let action = self.act(state, rng)?;
            let (next_state, reward, done) = env.step(action);
            self.learn(Exp {
                state,
                action,
                next_state,
                reward,
            })?;

            steps += 1;
            total_reward += reward;
            state = next_state;

            if done {
                break true;
            }
        };

        let episode = Episode {
            index: self.episode,
            steps,
            reward: total_reward,
            terminated,
        };
        if terminated {
            debug!(
                "episode {} terminated after {} steps with reward {}",
                episode.index, episode.steps, episode.reward
            );
        } else {
            warn!(
                "episode {} hit the step ceiling of {} without terminating",
                episode.index, episode.steps
            );
        }

        self.episode += 1;
        Ok(episode)
    }

    /// Play `episodes` training episodes in sequence
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        env: &mut E,
        episodes: u32,
        rng: &mut R,
    ) -> Result<Vec<Episode>> {
        let results = (0..episodes)
            .map(|_| self.go(env, rng))
            .collect::<Result<Vec<_>>>()?;

        let terminated = results.iter().filter(|e| e.terminated).count();
        info!(
            "trained {} episodes, {} terminated, {} truncated",
            results.len(),
            terminated,
            results.len() - terminated
        );
        Ok(results)
    }

    /// Follow the greedy policy from the start state for at most `max_steps` steps
    ///
    /// The table is left untouched. Not reaching a terminal state within the cap is
    /// reported through [`Rollout::success`], not as an error.
    pub fn evaluate(&self, env: &mut E, max_steps: usize) -> Result<Rollout<E::Action>> {
        let mut state = env.reset();
        let mut steps = Vec::with_capacity(max_steps);
        let mut success = false;

        for index in 0..max_steps {
            let action = self.q_table.best_action(state)?;
            let (next_state, _, done) = env.step(action);
            steps.push(RolloutStep {
                index,
                state,
                action,
                next_state,
            });
            state = next_state;

            if done {
                success = true;
                break;
            }
        }

        info!(
            "greedy rollout {} after {} steps",
            if success { "succeeded" } else { "failed" },
            steps.len()
        );
        Ok(Rollout { steps, success })
    }
}
