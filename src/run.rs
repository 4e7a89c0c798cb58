use log::info;
use rand::Rng;

use crate::{
    algo::tabular::{Episode, QTable, QTableAgent, Rollout},
    config::LearnerConfig,
    decay::Schedule,
    error::Result,
    gym::{Action, Corridor},
};

/// Everything produced by a train-then-evaluate run
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Final action-value table
    pub q_table: QTable<Action>,
    /// Per-episode training results, in order
    pub episodes: Vec<Episode>,
    /// Greedy rollout from the start state after training
    pub rollout: Rollout<Action>,
}

/// Train a fresh agent in a fresh corridor, then evaluate its greedy policy
///
/// The random source drives exploration only; with `epsilon == 0.0` the result
/// does not depend on it.
pub fn train_and_evaluate<R: Rng + ?Sized>(
    config: &LearnerConfig,
    rng: &mut R,
) -> Result<Outcome> {
    config.validate()?;

    let mut env = Corridor::new(config.corridor())?;
    let mut agent: QTableAgent<Corridor, Schedule> =
        QTableAgent::new(env.num_positions(), config.agent()?)?;

    info!(
        "training for {} episodes on a corridor of {} positions",
        config.episode_count,
        env.num_positions()
    );
    let episodes = agent.train(&mut env, config.episode_count, rng)?;
    let rollout = agent.evaluate(&mut env, config.eval_max_steps)?;

    Ok(Outcome {
        q_table: agent.into_q_table(),
        episodes,
        rollout,
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        config::EpsilonDecay,
        error::Error,
        gym::corridor::{pattern_reward, PATTERN_REWARD, STEP_REWARD},
    };

    #[test]
    fn default_run_completes() {
        let config = LearnerConfig::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = train_and_evaluate(&config, &mut rng).unwrap();

            assert_eq!(outcome.episodes.len(), 10);
            assert_eq!(outcome.q_table.num_states(), 5);
            assert!(outcome.rollout.len() <= 10);

            let actions = outcome.rollout.actions();
            if outcome.rollout.success {
                assert!(
                    actions.ends_with(&config.target_pattern),
                    "seed {seed}: a successful trace ends with the pattern"
                );
            } else {
                assert_eq!(actions.len(), 10, "seed {seed}: failure uses the full cap");
                for end in 1..=actions.len() {
                    assert!(
                        !pattern_reward(&actions[..end], &config.target_pattern).1,
                        "seed {seed}: a failed trace never contains the pattern"
                    );
                }
            }

            for episode in &outcome.episodes {
                assert!(episode.steps >= 1);
                if episode.terminated {
                    assert!(episode.steps >= 3, "the pattern needs three actions");
                }
            }
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let config = LearnerConfig::default();
        let a = train_and_evaluate(&config, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = train_and_evaluate(&config, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a.q_table, b.q_table);
        assert_eq!(a.episodes, b.episodes);
        assert_eq!(a.rollout, b.rollout);
    }

    #[test]
    fn greedy_runs_ignore_seed() {
        let config = LearnerConfig {
            epsilon: 0.0,
            max_episode_steps: Some(100),
            ..Default::default()
        };
        let a = train_and_evaluate(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = train_and_evaluate(&config, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.q_table, b.q_table, "identical tables without exploration");
        assert_eq!(a.rollout, b.rollout);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LearnerConfig {
            num_positions: 0,
            ..Default::default()
        };
        let result = train_and_evaluate(&config, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(Error::EmptyStateSpace)));

        let config = LearnerConfig {
            max_episode_steps: Some(0),
            ..Default::default()
        };
        let result = train_and_evaluate(&config, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(Error::ZeroStepCeiling)));
    }

    #[test]
    fn episode_totals_cover_one_episode() {
        let config = LearnerConfig::default();
        let outcome = train_and_evaluate(&config, &mut StdRng::seed_from_u64(11)).unwrap();

        for episode in &outcome.episodes {
            let expected = if episode.terminated {
                PATTERN_REWARD + STEP_REWARD * (episode.steps - 1) as f32
            } else {
                STEP_REWARD * episode.steps as f32
            };
            assert_eq!(
                episode.reward, expected,
                "episode {} counts only its own steps",
                episode.index
            );
        }
    }

    #[test]
    fn table_matches_corridor_size() {
        let config = LearnerConfig {
            num_positions: 7,
            ..Default::default()
        };
        let outcome = train_and_evaluate(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(outcome.q_table.num_states(), 7);
        assert!(outcome.q_table.row(6).is_ok(), "right wall has a row");
    }

    #[test]
    fn decaying_epsilon_run() {
        let config = LearnerConfig {
            epsilon: 1.0,
            epsilon_decay: Some(EpsilonDecay::Linear { rate: 1.0, end: 0.0 }),
            episode_count: 5,
            max_episode_steps: Some(50),
            ..Default::default()
        };
        let a = train_and_evaluate(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = train_and_evaluate(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.episodes.len(), 5);
        assert_eq!(a.q_table, b.q_table, "seeded decaying runs repeat");

        let exponential = LearnerConfig {
            epsilon_decay: Some(EpsilonDecay::Exponential { rate: 0.5, end: 0.05 }),
            ..Default::default()
        };
        let outcome = train_and_evaluate(&exponential, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(outcome.episodes.len(), 10);
    }
}
