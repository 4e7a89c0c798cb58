use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
///
/// The random source is passed in on every call, so a seeded generator makes
/// the whole training run reproducible.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon threshold at the given episode
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// Explores when a uniform draw from `[0, 1)` falls below epsilon, so an
    /// epsilon of `0.0` never explores and `1.0` always does.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay::{Constant, Linear};

    #[test]
    fn epsilon_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let never = EpsilonGreedy::new(Constant::new(0.0));
        let always = EpsilonGreedy::new(Constant::new(1.0));
        for episode in 0..1000 {
            assert_eq!(never.choose(episode, &mut rng), Choice::Exploit);
            assert_eq!(always.choose(episode, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let policy = EpsilonGreedy::new(Constant::new(0.3));
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let xs: Vec<_> = (0..100).map(|e| policy.choose(e, &mut a)).collect();
        let ys: Vec<_> = (0..100).map(|e| policy.choose(e, &mut b)).collect();
        assert_eq!(xs, ys, "choices are reproducible under a fixed seed");
        assert!(xs.contains(&Choice::Explore), "explores sometimes");
        assert!(xs.contains(&Choice::Exploit), "exploits sometimes");
    }

    #[test]
    fn decaying_epsilon() {
        let policy = EpsilonGreedy::new(Linear::new(0.1, 1.0, 0.0).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert_eq!(policy.epsilon(20), 0.0, "epsilon floors at its end value");
    }
}
