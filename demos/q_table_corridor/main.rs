use std::{error::Error, path::PathBuf};

use clap::{Parser, ValueEnum};
use corridor_rl::{config::EpsilonDecay, gym::Action, train_and_evaluate, LearnerConfig};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Learn to play `Right, Left, Right` in a five cell corridor with a Q-table
#[derive(Parser, Debug)]
struct Args {
    /// Number of cells in the corridor
    #[arg(long, default_value_t = 5)]
    num_positions: usize,

    /// Number of training episodes
    #[arg(long, default_value_t = 10)]
    episodes: u32,

    /// Learning rate α
    #[arg(long, default_value_t = 0.8)]
    learning_rate: f32,

    /// Discount factor γ
    #[arg(long, default_value_t = 0.9)]
    discount: f32,

    /// Exploration probability ε at the first episode
    #[arg(long, default_value_t = 0.3)]
    epsilon: f32,

    /// How ε changes over episodes
    #[arg(long, value_enum, default_value_t = DecayKind::Constant)]
    epsilon_decay: DecayKind,

    /// Decay rate of ε per episode
    #[arg(long, default_value_t = 0.1)]
    epsilon_decay_rate: f32,

    /// Final value ε decays towards
    #[arg(long, default_value_t = 0.01)]
    epsilon_end: f32,

    /// Target pattern as a string of `L` and `R`, e.g. `RLR`
    #[arg(long, default_value = "RLR", value_parser = parse_pattern)]
    pattern: Pattern,

    /// Step cap on the greedy evaluation rollout
    #[arg(long, default_value_t = 10)]
    eval_max_steps: usize,

    /// Per-episode step ceiling during training, 0 for none
    #[arg(long, default_value_t = 1000)]
    max_episode_steps: u32,

    /// Seed for the exploration random source
    #[arg(long)]
    seed: Option<u64>,

    /// Write per-episode results to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecayKind {
    Constant,
    Exponential,
    Linear,
}

#[derive(Clone, Debug)]
struct Pattern(Vec<Action>);

fn parse_pattern(s: &str) -> Result<Pattern, String> {
    s.chars()
        .map(|c| match c.to_ascii_uppercase() {
            'L' => Ok(Action::Left),
            'R' => Ok(Action::Right),
            other => Err(format!("unknown action `{other}`, expected `L` or `R`")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Pattern)
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let (rate, end) = (args.epsilon_decay_rate, args.epsilon_end);
    let epsilon_decay = match args.epsilon_decay {
        DecayKind::Constant => None,
        DecayKind::Exponential => Some(EpsilonDecay::Exponential { rate, end }),
        DecayKind::Linear => Some(EpsilonDecay::Linear { rate, end }),
    };
    let config = LearnerConfig {
        num_positions: args.num_positions,
        episode_count: args.episodes,
        learning_rate: args.learning_rate,
        discount: args.discount,
        epsilon: args.epsilon,
        epsilon_decay,
        target_pattern: args.pattern.0,
        eval_max_steps: args.eval_max_steps,
        max_episode_steps: (args.max_episode_steps > 0).then_some(args.max_episode_steps),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let outcome = train_and_evaluate(&config, &mut rng)?;

    if let Some(path) = args.csv {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["episode", "steps", "reward", "terminated"])?;
        for e in &outcome.episodes {
            wtr.write_record(&[
                e.index.to_string(),
                e.steps.to_string(),
                e.reward.to_string(),
                e.terminated.to_string(),
            ])?;
        }
        wtr.flush()?;
    }

    println!("Final Q-table:\n{}\n", outcome.q_table);
    println!("Greedy rollout:\n{}", outcome.rollout);

    Ok(())
}
