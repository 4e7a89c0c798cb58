use std::fmt;

/// One greedy step taken while evaluating a learned table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RolloutStep<A> {
    pub index: usize,
    pub state: usize,
    pub action: A,
    pub next_state: usize,
}

impl<A: fmt::Display> fmt::Display for RolloutStep<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {}: Position {} -> Action {} -> {}",
            self.index, self.state, self.action, self.next_state
        )
    }
}

/// Trace of a bounded greedy rollout
///
/// `success` is set when the episode terminated before the step cap ran out.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rollout<A> {
    pub steps: Vec<RolloutStep<A>>,
    pub success: bool,
}

impl<A: Copy> Rollout<A> {
    /// Actions in the order they were taken
    pub fn actions(&self) -> Vec<A> {
        self.steps.iter().map(|s| s.action).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<A: fmt::Display> fmt::Display for Rollout<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{step}")?;
        }
        if self.success {
            write!(f, "Success: target pattern reached in {} steps", self.steps.len())
        } else {
            write!(f, "Failure: target pattern not reached in {} steps", self.steps.len())
        }
    }
}
