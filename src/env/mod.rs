/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Update the environment in response to an action taken by an agent, producing
    /// a new state, its associated reward, and whether the episode has terminated
    ///
    /// Unlike a plain terminal `None`, the next state is always returned so that
    /// a learner can still bootstrap from it on the final transition.
    ///
    /// **Returns** `(next_state, reward, terminated)`
    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool);

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}
